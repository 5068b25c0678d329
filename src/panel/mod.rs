//! Граница между шиной и механизмом сигналов панели.
//!
//! - `adapter`: [`SignalAdapter`], разбор `(key, data)` в операции шины.
//! - `bridge`: [`NotifyBridge`], доставка в элементы, понимающие только сигналы.
//! - `controls`: [`ControlTree`], именованные элементы панели.
//! - `host`: [`Panel`], сборка всего вместе.
//! - `signal`: ключи и форма данных сигналов.

pub mod adapter;
pub mod bridge;
pub mod controls;
pub mod host;
pub mod signal;

pub use adapter::{SignalAdapter, SignalOutcome};
pub use bridge::{DeliveryConvention, NotifyBridge, SignalSink};
pub use controls::ControlTree;
pub use host::Panel;
pub use signal::{PublishRequest, Signal, SubscribeRequest, PUBLISH_KEY, SUBSCRIBE_KEY};
