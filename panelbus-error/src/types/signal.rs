use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Ошибки разбора входящих сигналов `(key, data)` от хоста.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// Ключ сигнала не относится к шине
    UnknownKey { key: String },
    /// Данные сигнала не соответствуют ожидаемой форме
    InvalidData { key: String, reason: String },
}

impl std::fmt::Display for SignalError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::UnknownKey { key } => write!(f, "Unknown signal key: '{key}'"),
            Self::InvalidData { key, reason } => {
                write!(f, "Invalid data for signal '{key}': {reason}")
            }
        }
    }
}

impl std::error::Error for SignalError {}

impl ErrorExt for SignalError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownKey { .. } => StatusCode::UnknownSignal,
            Self::InvalidData { .. } => StatusCode::InvalidSignalData,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_errors() {
        let err = SignalError::UnknownKey {
            key: "refresh".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::UnknownSignal);
        assert_eq!(err.to_string(), "Unknown signal key: 'refresh'");

        let err = SignalError::InvalidData {
            key: "broadcast".to_string(),
            reason: "missing field `topic`".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::InvalidSignalData);
        assert!(err.to_string().contains("missing field `topic`"));
    }
}
