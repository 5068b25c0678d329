use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок шины.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Подписки и подписчики
/// - 3xxx: Шаблоны тем
/// - 4xxx: Доставка сообщений
/// - 5xxx: Сигналы на границе с хостом
///
/// # Реализация:
/// - `num_enum::TryFromPrimitive` даёт нативную реализацию `TryFrom<u32>`.
/// - опционально: `strum` для `AsRefStr`/`EnumIter` (feature = "strum").
/// - опционально: `serde_repr` для сериализации в виде числового значения
///   (feature = "serde_repr").
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Internal = 1001,
    InvalidArgs = 1002,

    // === 2xxx: Подписки ===
    UnknownSubscriber = 2000,
    UnknownSubscription = 2001,
    SubscriberGone = 2002,

    // === 3xxx: Шаблоны ===
    MalformedPattern = 3000,
    PatternTooComplex = 3001,

    // === 4xxx: Доставка ===
    DeliveryFailed = 4000,
    DeliveryPanicked = 4001,

    // === 5xxx: Сигналы ===
    UnknownSignal = 5000,
    InvalidSignalData = 5001,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Пытается получить вариант `StatusCode` из `u32`.
    ///
    /// Возвращает `None`, если значение не соответствует ни одному варианту.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Вернёт `true`, если переданный `code` означает успешный результат.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Ошибка вызывающей стороны: неизвестное имя, битый шаблон или
    /// некорректные данные сигнала.
    pub fn is_caller_error(&self) -> bool {
        matches!(self.code(), 2000..=3999 | 5000..=5999) || matches!(self, Self::InvalidArgs)
    }

    /// Ошибка внутри обработчика подписчика (диапазон 4xxx).
    pub fn is_delivery_error(&self) -> bool {
        (4000..=4999).contains(&self.code())
    }

    /// Рекомендуемый уровень логирования для данного кода.
    ///
    /// Шина никогда не падает из-за ошибок, поэтому худший уровень здесь
    /// `Warn`, а `Error` оставлен для внутренних сбоев.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::SubscriberGone | Self::UnknownSubscription => LogLevel::Debug,
            Self::Internal | Self::Unknown => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет разделение ошибок вызывающей стороны и ошибок
    /// доставки.
    #[test]
    fn test_caller_vs_delivery() {
        assert!(StatusCode::UnknownSubscriber.is_caller_error());
        assert!(StatusCode::MalformedPattern.is_caller_error());
        assert!(StatusCode::InvalidSignalData.is_caller_error());
        assert!(StatusCode::InvalidArgs.is_caller_error());
        assert!(!StatusCode::DeliveryFailed.is_caller_error());

        assert!(StatusCode::DeliveryPanicked.is_delivery_error());
        assert!(!StatusCode::UnknownSignal.is_delivery_error());
    }

    /// Тест проверяет конвертацию через `TryFrom<u32>` и `from_u32`.
    #[test]
    fn test_from_try_from_u32() {
        let n = StatusCode::MalformedPattern.code();
        assert_eq!(
            StatusCode::try_from(n).unwrap(),
            StatusCode::MalformedPattern
        );
        assert!(StatusCode::from_u32(99999).is_none());
    }

    #[test]
    fn test_code_and_into() {
        let c = StatusCode::UnknownSubscriber;
        assert_eq!(c.code(), 2000);
        let n: u32 = c.into();
        assert_eq!(n, 2000);
        assert!(StatusCode::is_success(StatusCode::Success.code()));
        assert!(!StatusCode::is_success(c.code()));
    }

    #[test]
    fn test_log_level_mappings() {
        assert_eq!(StatusCode::Success.log_level(), LogLevel::Trace);
        assert_eq!(StatusCode::SubscriberGone.log_level(), LogLevel::Debug);
        assert_eq!(StatusCode::DeliveryFailed.log_level(), LogLevel::Warn);
        assert_eq!(StatusCode::Internal.log_level(), LogLevel::Error);
    }

    /// Тест проверяет формат `Display`: строка должна содержать имя
    /// варианта и числовой код.
    #[test]
    fn test_display_contains_name_and_code() {
        let s = format!("{}", StatusCode::DeliveryFailed);
        assert!(s.contains("4000"), "Display must contain code 4000, got: {s}");
        assert!(
            s.contains("DeliveryFailed"),
            "Display must contain variant name 'DeliveryFailed', got: {s}"
        );
    }
}
