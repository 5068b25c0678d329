use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Ошибки реестра подписок и диспетчера.
///
/// Ни одна из них не прерывает `publish`: диспетчер записывает ошибку в лог
/// и переходит к следующей подписке.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Имя контрола не нашлось в дереве панели, подписка не создана
    UnknownSubscriber { name: String },
    /// `unsubscribe` с идентификатором, которого нет в реестре
    UnknownSubscription { id: u64 },
    /// Хост уже освободил подписчика, запись пропускается
    SubscriberGone { subscriber: String },
    /// Шаблон не удалось разобрать или вычислить
    MalformedPattern { pattern: String, reason: String },
    /// Шаблон превысил предел вложенности сопоставления
    PatternTooComplex { pattern: String },
    /// Обработчик подписчика вернул ошибку
    DeliveryFailed {
        subscriber: String,
        topic: String,
        reason: String,
    },
    /// Обработчик подписчика запаниковал
    DeliveryPanicked {
        subscriber: String,
        topic: String,
        reason: String,
    },
}

impl std::fmt::Display for BusError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::UnknownSubscriber { name } => write!(f, "Unknown subscriber: {name}"),
            Self::UnknownSubscription { id } => write!(f, "Unknown subscription: #{id}"),
            Self::SubscriberGone { subscriber } => {
                write!(f, "Subscriber '{subscriber}' is no longer alive")
            }
            Self::MalformedPattern { pattern, reason } => {
                write!(f, "Malformed pattern '{pattern}': {reason}")
            }
            Self::PatternTooComplex { pattern } => write!(f, "Pattern too complex: '{pattern}'"),
            Self::DeliveryFailed {
                subscriber,
                topic,
                reason,
            } => write!(f, "Delivery of '{topic}' to '{subscriber}' failed: {reason}"),
            Self::DeliveryPanicked {
                subscriber,
                topic,
                reason,
            } => write!(
                f,
                "Subscriber '{subscriber}' panicked while handling '{topic}': {reason}"
            ),
        }
    }
}

impl std::error::Error for BusError {}

impl ErrorExt for BusError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownSubscriber { .. } => StatusCode::UnknownSubscriber,
            Self::UnknownSubscription { .. } => StatusCode::UnknownSubscription,
            Self::SubscriberGone { .. } => StatusCode::SubscriberGone,
            Self::MalformedPattern { .. } => StatusCode::MalformedPattern,
            Self::PatternTooComplex { .. } => StatusCode::PatternTooComplex,
            Self::DeliveryFailed { .. } => StatusCode::DeliveryFailed,
            Self::DeliveryPanicked { .. } => StatusCode::DeliveryPanicked,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
