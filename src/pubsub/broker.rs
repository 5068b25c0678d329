use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::atomic::{AtomicU64, Ordering},
};

use panelbus_error::{BusError, BusResult};
use serde_json::Value;

use super::{Message, Registry, Subscriber, SubscriberRef, SubscriptionId};
use crate::{config::BusSettings, error::report, pattern::MatchMode};

/// Шина широковещательной рассылки.
///
/// Поддерживает:
/// - Подписки по шаблону темы в порядке регистрации
/// - Синхронную доставку с изоляцией ошибок и паник подписчиков
/// - Отписку по идентификатору со снимком реестра на момент `publish`
/// - Статистику публикаций и ошибок доставки
///
/// Глобального состояния нет: каждая панель создаёт свою шину и раздаёт
/// её через `Arc`.
#[derive(Debug, Default)]
pub struct Bus {
    registry: Registry,
    settings: BusSettings,
    stats: BusStats,
}

/// Счётчики шины.
#[derive(Debug, Default)]
pub struct BusStats {
    /// Общее количество вызовов `publish`
    pub publishes: AtomicU64,
    /// Успешные доставки
    pub deliveries: AtomicU64,
    /// Обработчик вернул ошибку или запаниковал
    pub delivery_failures: AtomicU64,
    /// Шаблон не удалось вычислить
    pub pattern_errors: AtomicU64,
    /// Подписчик уже освобождён хостом
    pub dropped_subscribers: AtomicU64,
}

/// Копия счётчиков на момент чтения.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStatsSnapshot {
    pub publishes: u64,
    pub deliveries: u64,
    pub delivery_failures: u64,
    pub pattern_errors: u64,
    pub dropped_subscribers: u64,
}

/// Описание подписки для диагностики.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionInfo {
    pub id: SubscriptionId,
    pub pattern: String,
    pub mode: MatchMode,
    pub subscriber: String,
    pub alive: bool,
}

impl Bus {
    /// Создаёт шину с настройками по умолчанию.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: BusSettings) -> Self {
        Self {
            registry: Registry::new(),
            settings,
            stats: BusStats::default(),
        }
    }

    pub fn settings(&self) -> &BusSettings {
        &self.settings
    }

    /// Подписка с режимом сопоставления из настроек.
    ///
    /// Шаблон не проверяется: битый шаблон проявится при `publish`.
    pub fn register(
        &self,
        pattern: impl Into<String>,
        subscriber: &SubscriberRef,
    ) -> SubscriptionId {
        self.register_with_mode(pattern, self.settings.match_mode, subscriber)
    }

    pub fn register_with_mode(
        &self,
        pattern: impl Into<String>,
        mode: MatchMode,
        subscriber: &SubscriberRef,
    ) -> SubscriptionId {
        let pattern = pattern.into();
        let id = self.registry.insert(pattern.as_str(), mode, subscriber);
        tracing::debug!(
            id = %id,
            pattern = %pattern,
            mode = %mode,
            subscriber = subscriber.name(),
            "Subscription registered"
        );
        id
    }

    /// Отписка. Уже идущие `publish` работают со своим снимком и ещё могут
    /// доставить сообщение этой подписке.
    pub fn unsubscribe(
        &self,
        id: SubscriptionId,
    ) -> BusResult<()> {
        match self.registry.remove(id) {
            Some(entry) => {
                tracing::debug!(
                    id = %id,
                    pattern = entry.pattern(),
                    subscriber = entry.subscriber_name(),
                    "Subscription removed"
                );
                Ok(())
            }
            None => Err(BusError::UnknownSubscription { id: id.get() }),
        }
    }

    /// Сбрасывает все подписки, как при новой сессии панели.
    pub fn clear(&self) {
        let removed = self.registry.clear();
        tracing::debug!(removed, "Registry cleared");
    }

    /// Публикация сообщения.
    ///
    /// Просматривает снимок реестра в порядке регистрации и синхронно
    /// доставляет `(topic, payload)` каждому совпавшему подписчику. Ошибки
    /// шаблонов и подписчиков пишутся в лог и не прерывают просмотр.
    pub fn publish(
        &self,
        topic: &str,
        payload: &Value,
    ) {
        self.stats.publishes.fetch_add(1, Ordering::Relaxed);
        let snapshot = self.registry.snapshot();
        let mut matched = 0usize;

        for entry in snapshot.iter() {
            match entry.matches(topic) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    self.stats.pattern_errors.fetch_add(1, Ordering::Relaxed);
                    report(&err.into_bus_error(entry.pattern()));
                    continue;
                }
            }
            matched += 1;

            let Some(subscriber) = entry.subscriber() else {
                self.stats
                    .dropped_subscribers
                    .fetch_add(1, Ordering::Relaxed);
                report(&BusError::SubscriberGone {
                    subscriber: entry.subscriber_name().to_string(),
                });
                continue;
            };
            self.deliver(subscriber.as_ref(), topic, payload);
        }

        tracing::trace!(
            topic,
            subscriptions = snapshot.len(),
            matched,
            "Message published"
        );
    }

    pub fn publish_message(
        &self,
        message: &Message,
    ) {
        self.publish(&message.topic, &message.payload);
    }

    /// Подписки в порядке доставки.
    pub fn subscriptions(&self) -> Vec<SubscriptionInfo> {
        self.registry
            .snapshot()
            .iter()
            .map(|entry| SubscriptionInfo {
                id: entry.id(),
                pattern: entry.pattern().to_string(),
                mode: entry.mode(),
                subscriber: entry.subscriber_name().to_string(),
                alive: entry.subscriber().is_some(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn stats(&self) -> BusStatsSnapshot {
        BusStatsSnapshot {
            publishes: self.stats.publishes.load(Ordering::Relaxed),
            deliveries: self.stats.deliveries.load(Ordering::Relaxed),
            delivery_failures: self.stats.delivery_failures.load(Ordering::Relaxed),
            pattern_errors: self.stats.pattern_errors.load(Ordering::Relaxed),
            dropped_subscribers: self.stats.dropped_subscribers.load(Ordering::Relaxed),
        }
    }

    /// Доставка одному подписчику под защитой: ошибка или паника
    /// обработчика превращаются в запись лога.
    fn deliver(
        &self,
        subscriber: &dyn Subscriber,
        topic: &str,
        payload: &Value,
    ) {
        let outcome = if self.settings.catch_panics {
            panic::catch_unwind(AssertUnwindSafe(|| subscriber.deliver(topic, payload)))
        } else {
            Ok(subscriber.deliver(topic, payload))
        };

        let err = match outcome {
            Ok(Ok(())) => {
                self.stats.deliveries.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(topic, subscriber = subscriber.name(), "Delivered");
                return;
            }
            Ok(Err(err)) => BusError::DeliveryFailed {
                subscriber: subscriber.name().to_string(),
                topic: topic.to_string(),
                reason: err.to_string(),
            },
            Err(panic) => BusError::DeliveryPanicked {
                subscriber: subscriber.name().to_string(),
                topic: topic.to_string(),
                reason: panic_message(panic.as_ref()),
            },
        };
        self.stats.delivery_failures.fetch_add(1, Ordering::Relaxed);
        report(&err);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::pubsub::subscriber_fn;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Helper: подписчик, который записывает своё имя и тему в общий лог.
    fn recorder(
        name: &'static str,
        log: &Log,
    ) -> SubscriberRef {
        let log = log.clone();
        subscriber_fn(name, move |topic, _| {
            log.lock().unwrap().push(format!("{name}:{topic}"));
            Ok(())
        })
    }

    #[test]
    fn test_publish_counts_and_delivers() {
        let bus = Bus::new();
        let log = Log::default();
        let a = recorder("A", &log);
        bus.register("Transport", &a);

        bus.publish("Sequencer|Transport|Play", &Value::Null);
        bus.publish("Sequencer|PlayHead|Beat", &Value::Null);

        assert_eq!(*log.lock().unwrap(), vec!["A:Sequencer|Transport|Play"]);
        let stats = bus.stats();
        assert_eq!(stats.publishes, 2);
        assert_eq!(stats.deliveries, 1);
        assert_eq!(stats.delivery_failures, 0);
    }

    /// Тест проверяет, что паника одного подписчика не мешает следующим.
    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let bus = Bus::new();
        let log = Log::default();
        let boom = subscriber_fn("Boom", |_, _| panic!("handler exploded"));
        let after = recorder("After", &log);
        bus.register("Transport", &boom);
        bus.register("Transport", &after);

        bus.publish("Sequencer|Transport|Stop", &Value::Null);

        assert_eq!(*log.lock().unwrap(), vec!["After:Sequencer|Transport|Stop"]);
        assert_eq!(bus.stats().delivery_failures, 1);
        assert_eq!(bus.stats().deliveries, 1);
    }

    #[test]
    #[should_panic(expected = "handler exploded")]
    fn test_panic_propagates_when_catching_disabled() {
        let bus = Bus::with_settings(BusSettings {
            catch_panics: false,
            ..BusSettings::default()
        });
        let boom = subscriber_fn("Boom", |_, _| panic!("handler exploded"));
        bus.register("Transport", &boom);

        bus.publish("Sequencer|Transport|Stop", &Value::Null);
    }

    #[test]
    fn test_malformed_pattern_counts_and_continues() {
        let bus = Bus::new();
        let log = Log::default();
        let broken = recorder("Broken", &log);
        let good = recorder("Good", &log);
        bus.register("Transport|[", &broken);
        bus.register("Transport", &good);

        bus.publish("Sequencer|Transport|Play", &json!({}));

        assert_eq!(*log.lock().unwrap(), vec!["Good:Sequencer|Transport|Play"]);
        assert_eq!(bus.stats().pattern_errors, 1);
    }

    #[test]
    fn test_dropped_subscriber_is_skipped() {
        let bus = Bus::new();
        let log = Log::default();
        let gone = recorder("Gone", &log);
        bus.register("x", &gone);
        drop(gone);

        bus.publish("x", &Value::Null);

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(bus.stats().dropped_subscribers, 1);
        assert!(!bus.subscriptions()[0].alive);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = Bus::new();
        let log = Log::default();
        let a = recorder("A", &log);
        let id = bus.register("x", &a);

        bus.unsubscribe(id).unwrap();
        assert_eq!(
            bus.unsubscribe(id).unwrap_err(),
            BusError::UnknownSubscription { id: id.get() }
        );

        bus.publish("x", &Value::Null);
        assert!(log.lock().unwrap().is_empty());
        assert!(bus.is_empty());
    }

    #[test]
    fn test_default_mode_comes_from_settings() {
        let bus = Bus::with_settings(BusSettings {
            match_mode: MatchMode::Anchored,
            ..BusSettings::default()
        });
        let log = Log::default();
        let a = recorder("A", &log);
        bus.register("Transport", &a);

        bus.publish("Sequencer|Transport|Play", &Value::Null);
        bus.publish("Transport", &Value::Null);

        assert_eq!(*log.lock().unwrap(), vec!["A:Transport"]);
        assert_eq!(bus.subscriptions()[0].mode, MatchMode::Anchored);
    }

    #[test]
    fn test_clear_resets_registry() {
        let bus = Bus::new();
        let log = Log::default();
        let a = recorder("A", &log);
        bus.register("x", &a);
        bus.register("y", &a);
        assert_eq!(bus.len(), 2);

        bus.clear();
        bus.publish("xy", &Value::Null);
        assert!(bus.is_empty());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u32), "non-string panic payload");
    }
}
