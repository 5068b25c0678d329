//! Интерфейс (порт) шины для адаптеров.
//!
//! Закрытый набор операций вместо строковых ключей сигналов:
//! - `subscribe`: подписаться с режимом по умолчанию.
//! - `subscribe_with_mode`: подписаться с явным режимом сопоставления.
//! - `unsubscribe`: снять подписку по идентификатору.
//! - `publish`: разослать сообщение всем совпавшим подписчикам.

use std::sync::Arc;

use panelbus_error::BusResult;
use serde_json::Value;

use crate::{
    pattern::MatchMode,
    pubsub::{Bus, SubscriberRef, SubscriptionId},
};

pub trait BusPort: Send + Sync {
    /// Подписаться с режимом сопоставления по умолчанию.
    fn subscribe(
        &self,
        pattern: &str,
        subscriber: &SubscriberRef,
    ) -> SubscriptionId;
    /// Подписаться с явным режимом сопоставления.
    fn subscribe_with_mode(
        &self,
        pattern: &str,
        mode: MatchMode,
        subscriber: &SubscriberRef,
    ) -> SubscriptionId;
    /// Снять подписку.
    fn unsubscribe(
        &self,
        id: SubscriptionId,
    ) -> BusResult<()>;
    /// Опубликовать сообщение.
    fn publish(
        &self,
        topic: &str,
        payload: &Value,
    );
}

impl BusPort for Bus {
    fn subscribe(
        &self,
        pattern: &str,
        subscriber: &SubscriberRef,
    ) -> SubscriptionId {
        self.register(pattern, subscriber)
    }

    fn subscribe_with_mode(
        &self,
        pattern: &str,
        mode: MatchMode,
        subscriber: &SubscriberRef,
    ) -> SubscriptionId {
        self.register_with_mode(pattern, mode, subscriber)
    }

    fn unsubscribe(
        &self,
        id: SubscriptionId,
    ) -> BusResult<()> {
        Bus::unsubscribe(self, id)
    }

    fn publish(
        &self,
        topic: &str,
        payload: &Value,
    ) {
        Bus::publish(self, topic, payload)
    }
}

impl<B: BusPort + ?Sized> BusPort for Arc<B> {
    fn subscribe(
        &self,
        pattern: &str,
        subscriber: &SubscriberRef,
    ) -> SubscriptionId {
        (**self).subscribe(pattern, subscriber)
    }

    fn subscribe_with_mode(
        &self,
        pattern: &str,
        mode: MatchMode,
        subscriber: &SubscriberRef,
    ) -> SubscriptionId {
        (**self).subscribe_with_mode(pattern, mode, subscriber)
    }

    fn unsubscribe(
        &self,
        id: SubscriptionId,
    ) -> BusResult<()> {
        (**self).unsubscribe(id)
    }

    fn publish(
        &self,
        topic: &str,
        payload: &Value,
    ) {
        (**self).publish(topic, payload)
    }
}
