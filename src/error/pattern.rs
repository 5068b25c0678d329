use panelbus_error::BusError;
use thiserror::Error;

/// Ошибка разбора или вычисления шаблона темы.
///
/// Тексты сообщений совпадают с сообщениями `string.find` из Lua, чтобы
/// авторы шаблонов видели привычные формулировки.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("malformed pattern (ends with '%')")]
    TrailingEscape,

    #[error("malformed pattern (missing ']')")]
    MissingBracket,

    #[error("malformed pattern (missing arguments to '%b')")]
    MissingBalanceArgs,

    #[error("missing '[' after '%f' in pattern")]
    MissingFrontierSet,

    #[error("invalid capture index %{0}")]
    InvalidCaptureIndex(usize),

    #[error("invalid pattern capture")]
    UnmatchedCaptureClose,

    #[error("unfinished capture")]
    UnfinishedCapture,

    #[error("too many captures")]
    TooManyCaptures,

    #[error("pattern too complex")]
    TooComplex,

    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),
}

impl PatternError {
    /// Переводит ошибку шаблона в ошибку шины для записи в лог.
    pub fn into_bus_error(
        self,
        pattern: &str,
    ) -> BusError {
        match self {
            PatternError::TooComplex => BusError::PatternTooComplex {
                pattern: pattern.to_string(),
            },
            other => BusError::MalformedPattern {
                pattern: pattern.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

impl From<globset::Error> for PatternError {
    fn from(err: globset::Error) -> Self {
        PatternError::InvalidGlob(err.kind().to_string())
    }
}

#[cfg(test)]
mod tests {
    use globset::Glob;
    use panelbus_error::{ErrorExt, StatusCode};

    use super::*;

    #[test]
    fn test_pattern_error_display() {
        assert_eq!(
            PatternError::MissingBracket.to_string(),
            "malformed pattern (missing ']')"
        );
        assert_eq!(
            PatternError::InvalidCaptureIndex(2).to_string(),
            "invalid capture index %2"
        );
    }

    #[test]
    fn test_globset_conversion() {
        let glob_err = Glob::new("[").unwrap_err();
        let err: PatternError = glob_err.into();
        assert!(matches!(err, PatternError::InvalidGlob(_)));
    }

    /// Тест проверяет, что `TooComplex` получает собственный код, а
    /// остальные ошибки становятся `MalformedPattern`.
    #[test]
    fn test_into_bus_error() {
        let err = PatternError::TooComplex.into_bus_error("(.-)*");
        assert_eq!(err.status_code(), StatusCode::PatternTooComplex);

        let err = PatternError::TrailingEscape.into_bus_error("abc%");
        assert_eq!(
            err,
            BusError::MalformedPattern {
                pattern: "abc%".to_string(),
                reason: "malformed pattern (ends with '%')".to_string(),
            }
        );
    }
}
