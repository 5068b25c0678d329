use panelbus_error::{BusError, SignalError};
use serde_json::Value;

use super::signal::{PublishRequest, Signal, SubscribeRequest};
use crate::{
    application::{BusPort, ControlResolver},
    error::report,
    pattern::MatchMode,
    pubsub::SubscriptionId,
};

/// Что сделал адаптер с сигналом.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Subscribed(SubscriptionId),
    /// Элемент с таким именем не найден, подписка пропущена
    UnresolvedControl,
    Published,
}

/// Входная точка сигналов панели: переводит `(key, data)` в операции шины.
#[derive(Debug)]
pub struct SignalAdapter<B, R> {
    bus: B,
    resolver: R,
    mode: Option<MatchMode>,
}

impl<B: BusPort, R: ControlResolver> SignalAdapter<B, R> {
    pub fn new(
        bus: B,
        resolver: R,
    ) -> Self {
        Self {
            bus,
            resolver,
            mode: None,
        }
    }

    /// Режим для подписок через сигналы. Без него действует режим шины.
    pub fn with_mode(
        mut self,
        mode: MatchMode,
    ) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Обработка сигнала без результата: ошибки только пишутся в лог.
    pub fn notify(
        &self,
        key: &str,
        data: &Value,
    ) {
        if let Err(err) = self.try_notify(key, data) {
            report(&err);
        }
    }

    /// Как [`notify`](Self::notify), но возвращает ошибку разбора сигнала.
    pub fn try_notify(
        &self,
        key: &str,
        data: &Value,
    ) -> Result<SignalOutcome, SignalError> {
        let signal = Signal::parse(key, data)?;
        Ok(self.handle(signal))
    }

    pub fn handle(
        &self,
        signal: Signal,
    ) -> SignalOutcome {
        match signal {
            Signal::Subscribe(SubscribeRequest {
                topic,
                control_name,
            }) => self
                .subscribe(&topic, &control_name)
                .map_or(SignalOutcome::UnresolvedControl, SignalOutcome::Subscribed),
            Signal::Publish(PublishRequest { topic, message }) => {
                self.bus.publish(&topic, &message);
                SignalOutcome::Published
            }
        }
    }

    /// Подписывает элемент по имени. Неизвестное имя не ошибка для
    /// вызывающего: событие пишется в лог, подписка не создаётся.
    pub fn subscribe(
        &self,
        pattern: &str,
        control_name: &str,
    ) -> Option<SubscriptionId> {
        let Some(control) = self.resolver.resolve(control_name) else {
            report(&BusError::UnknownSubscriber {
                name: control_name.to_string(),
            });
            return None;
        };
        Some(match self.mode {
            Some(mode) => self.bus.subscribe_with_mode(pattern, mode, &control),
            None => self.bus.subscribe(pattern, &control),
        })
    }

    pub fn publish(
        &self,
        topic: &str,
        payload: &Value,
    ) {
        self.bus.publish(topic, payload);
    }
}
