pub mod pubsub_port;
pub mod resolver_port;

pub use pubsub_port::BusPort;
pub use resolver_port::ControlResolver;
