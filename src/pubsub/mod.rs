//! Шина широковещательной рассылки (pub/sub) для элементов панели.
//!
//! - `broker`: шина [`Bus`], доставка и статистика.
//! - `message`: пара `(topic, payload)`.
//! - `registry` (приватный): упорядоченный реестр подписок со снимками.
//! - `subscriber`: трейт адресуемого подписчика.
//!
//! Публичный API переэкспортирует:
//! - `broker::*`
//! - `message::*`
//! - `registry::{Subscription, SubscriptionId}`
//! - `subscriber::*`

pub mod broker;
pub mod message;
mod registry;
pub mod subscriber;

pub use broker::*;
pub use message::*;
pub(crate) use registry::Registry;
pub use registry::{Subscription, SubscriptionId};
pub use subscriber::*;
