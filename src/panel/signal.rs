use panelbus_error::SignalError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ключ сигнала подписки.
pub const SUBSCRIBE_KEY: &str = "broadcast-subscribe";
/// Ключ сигнала публикации.
pub const PUBLISH_KEY: &str = "broadcast";

/// Данные сигнала `broadcast-subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub topic: String,
    #[serde(rename = "controlName")]
    pub control_name: String,
}

/// Данные сигнала `broadcast`. Отсутствующее `message` равно `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub topic: String,
    #[serde(default)]
    pub message: Value,
}

/// Разобранный входящий сигнал.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Subscribe(SubscribeRequest),
    Publish(PublishRequest),
}

impl Signal {
    /// Разбирает пару `(key, data)` из механизма сигналов панели.
    pub fn parse(
        key: &str,
        data: &Value,
    ) -> Result<Self, SignalError> {
        let invalid = |err: serde_json::Error| SignalError::InvalidData {
            key: key.to_string(),
            reason: err.to_string(),
        };
        match key {
            SUBSCRIBE_KEY => SubscribeRequest::deserialize(data)
                .map(Signal::Subscribe)
                .map_err(invalid),
            PUBLISH_KEY => PublishRequest::deserialize(data)
                .map(Signal::Publish)
                .map_err(invalid),
            _ => Err(SignalError::UnknownKey {
                key: key.to_string(),
            }),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Signal::Subscribe(_) => SUBSCRIBE_KEY,
            Signal::Publish(_) => PUBLISH_KEY,
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            Signal::Subscribe(req) => &req.topic,
            Signal::Publish(req) => &req.topic,
        }
    }

    /// Данные сигнала в том виде, в каком их шлёт панель.
    pub fn to_data(&self) -> Value {
        let data = match self {
            Signal::Subscribe(req) => serde_json::to_value(req),
            Signal::Publish(req) => serde_json::to_value(req),
        };
        data.unwrap_or(Value::Null)
    }
}
