use std::fmt;

use serde_json::{json, Value};

use crate::pubsub::{DeliveryResult, Subscriber};

/// Точка входа направленных сигналов старого элемента панели.
pub trait SignalSink: Send + Sync {
    fn notify(
        &self,
        key: &str,
        data: &Value,
    ) -> DeliveryResult;
}

impl<F> SignalSink for F
where
    F: Fn(&str, &Value) -> DeliveryResult + Send + Sync,
{
    fn notify(
        &self,
        key: &str,
        data: &Value,
    ) -> DeliveryResult {
        self(key, data)
    }
}

/// Как доставка `(topic, payload)` превращается в сигнал.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeliveryConvention {
    /// Ключ сигнала равен теме, данные равны payload
    #[default]
    TopicAsKey,
    /// Фиксированный ключ, данные `{ "topic": ..., "message": ... }`
    FixedKey(String),
}

impl DeliveryConvention {
    /// `None` означает [`DeliveryConvention::TopicAsKey`].
    pub fn from_key(key: Option<String>) -> Self {
        key.map_or(DeliveryConvention::TopicAsKey, DeliveryConvention::FixedKey)
    }

    pub fn to_signal<'a>(
        &'a self,
        topic: &'a str,
        payload: &Value,
    ) -> (&'a str, Value) {
        match self {
            DeliveryConvention::TopicAsKey => (topic, payload.clone()),
            DeliveryConvention::FixedKey(key) => {
                (key.as_str(), json!({ "topic": topic, "message": payload }))
            }
        }
    }
}

/// Подписчик поверх [`SignalSink`].
pub struct NotifyBridge<S> {
    name: String,
    sink: S,
    convention: DeliveryConvention,
}

impl<S: SignalSink> NotifyBridge<S> {
    pub fn new(
        name: impl Into<String>,
        sink: S,
        convention: DeliveryConvention,
    ) -> Self {
        Self {
            name: name.into(),
            sink,
            convention,
        }
    }

    pub fn convention(&self) -> &DeliveryConvention {
        &self.convention
    }
}

impl<S: SignalSink> Subscriber for NotifyBridge<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(
        &self,
        topic: &str,
        payload: &Value,
    ) -> DeliveryResult {
        let (key, data) = self.convention.to_signal(topic, payload);
        self.sink.notify(key, &data)
    }
}

impl<S> fmt::Debug for NotifyBridge<S> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("NotifyBridge")
            .field("name", &self.name)
            .field("convention", &self.convention)
            .finish_non_exhaustive()
    }
}
