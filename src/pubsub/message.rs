use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Сообщение шины: тема и произвольная структурированная нагрузка.
///
/// Шина не разбирает ни тему, ни нагрузку; `Null` означает пустое
/// сообщение.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    #[serde(default)]
    pub payload: Value,
}

impl Message {
    pub fn new(
        topic: impl Into<String>,
        payload: impl Into<Value>,
    ) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Сообщение без нагрузки.
    pub fn empty(topic: impl Into<String>) -> Self {
        Self::new(topic, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_creation_with_map_payload() {
        let msg = Message::new("Mixer|Volume", json!({ "channel": 3, "db": -6.0 }));
        assert_eq!(msg.topic, "Mixer|Volume");
        assert_eq!(msg.payload["channel"], 3);
    }

    #[test]
    fn test_empty_message() {
        let msg = Message::empty("Sequencer|Transport|Stop");
        assert!(msg.payload.is_null());
    }

    /// Тест проверяет, что отсутствующая нагрузка при десериализации
    /// становится `Null`.
    #[test]
    fn test_missing_payload_deserializes_to_null() {
        let msg: Message = serde_json::from_str(r#"{"topic":"Sequencer|Transport|Play"}"#).unwrap();
        assert_eq!(msg, Message::empty("Sequencer|Transport|Play"));
    }
}
