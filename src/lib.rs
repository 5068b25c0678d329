/// Ports between the bus and its adapters: BusPort, ControlResolver.
pub mod application;
/// Settings loading: bus defaults and logging.
pub mod config;
/// Pattern errors and error reporting to the log.
pub mod error;
/// Flexible logging (formatting, filters, sinks).
pub mod logging;
/// Panel boundary: signal adapter, control tree, notify bridge.
pub mod panel;
/// Lua-style topic patterns and match modes.
pub mod pattern;
/// Pub/Sub: Bus, Subscriber, Message.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Bus ports.
pub use application::{BusPort, ControlResolver};
/// config
pub use config::{BusSettings, Settings};
/// Operation errors and result types.
pub use error::PatternError;
/// Logging setup.
pub use logging::{init_logging, LoggingConfig, LoggingHandle};
/// Panel boundary.
pub use panel::{
    ControlTree, DeliveryConvention, NotifyBridge, Panel, Signal, SignalAdapter, SignalOutcome,
    SignalSink, PUBLISH_KEY, SUBSCRIBE_KEY,
};
/// Error taxonomy shared with hosts.
pub use panelbus_error::{BusError, BusResult, SignalError, StatusCode};
/// Patterns.
pub use pattern::{MatchMode, Pattern, TopicMatcher};
/// Pub/Sub API.
pub use pubsub::{
    subscriber_fn, Bus, BusStatsSnapshot, DeliveryError, DeliveryResult, Message, Subscriber,
    SubscriberRef, SubscriptionId, SubscriptionInfo,
};
