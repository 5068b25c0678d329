use std::{fmt, sync::Arc};

use serde_json::Value;

/// Ошибка, которую обработчик подписчика может вернуть шине.
pub type DeliveryError = Box<dyn std::error::Error + Send + Sync>;

pub type DeliveryResult = Result<(), DeliveryError>;

/// Адресуемый обработчик, получающий пары `(topic, payload)`.
///
/// Временем жизни подписчика владеет хост (панель). Шина хранит только
/// слабую ссылку и пропускает подписчиков, которых хост уже освободил.
pub trait Subscriber: Send + Sync {
    /// Имя для логов и диагностики.
    fn name(&self) -> &str;

    /// Доставка одного сообщения. Ошибка и паника изолированы шиной и не
    /// мешают доставке остальным подписчикам.
    fn deliver(
        &self,
        topic: &str,
        payload: &Value,
    ) -> DeliveryResult;
}

/// Сильная ссылка на подписчика, которой владеет хост.
pub type SubscriberRef = Arc<dyn Subscriber>;

/// Подписчик из замыкания.
pub struct FnSubscriber<F> {
    name: String,
    handler: F,
}

impl<F> FnSubscriber<F>
where
    F: Fn(&str, &Value) -> DeliveryResult + Send + Sync,
{
    pub fn new(
        name: impl Into<String>,
        handler: F,
    ) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }
}

impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(&str, &Value) -> DeliveryResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(
        &self,
        topic: &str,
        payload: &Value,
    ) -> DeliveryResult {
        (self.handler)(topic, payload)
    }
}

impl<F> fmt::Debug for FnSubscriber<F> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("FnSubscriber")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Оборачивает замыкание в [`SubscriberRef`].
pub fn subscriber_fn<F>(
    name: impl Into<String>,
    handler: F,
) -> SubscriberRef
where
    F: Fn(&str, &Value) -> DeliveryResult + Send + Sync + 'static,
{
    Arc::new(FnSubscriber::new(name, handler))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_fn_subscriber_delivers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = subscriber_fn("Transport", move |topic, payload| {
            sink.lock().unwrap().push((topic.to_string(), payload.clone()));
            Ok(())
        });

        assert_eq!(sub.name(), "Transport");
        sub.deliver("Sequencer|Transport|Play", &json!({ "beat": 1 }))
            .unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("Sequencer|Transport|Play".to_string(), json!({ "beat": 1 }))]
        );
    }

    #[test]
    fn test_fn_subscriber_error_passthrough() {
        let sub = subscriber_fn("Broken", |_, _| Err("not ready".into()));
        let err = sub.deliver("x", &Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "not ready");
    }
}
