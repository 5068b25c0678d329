pub mod bus;
pub mod signal;

pub use bus::*;
pub use signal::*;
