use std::sync::Arc;

use serde_json::Value;

use super::{
    adapter::{SignalAdapter, SignalOutcome},
    bridge::{DeliveryConvention, NotifyBridge, SignalSink},
    controls::ControlTree,
};
use crate::{
    config::BusSettings,
    pubsub::{Bus, SubscriberRef},
};

/// Панель: шина, дерево элементов и адаптер сигналов вместе.
///
/// Каждая панель владеет собственной шиной; общего состояния между
/// панелями нет.
#[derive(Debug)]
pub struct Panel {
    adapter: SignalAdapter<Arc<Bus>, Arc<ControlTree>>,
    convention: DeliveryConvention,
}

impl Panel {
    pub fn new(settings: BusSettings) -> Self {
        let convention = DeliveryConvention::from_key(settings.delivery_key.clone());
        let bus = Arc::new(Bus::with_settings(settings));
        Self {
            adapter: SignalAdapter::new(bus, Arc::new(ControlTree::new())),
            convention,
        }
    }

    pub fn bus(&self) -> &Arc<Bus> {
        self.adapter.bus()
    }

    pub fn controls(&self) -> &Arc<ControlTree> {
        self.adapter.resolver()
    }

    pub fn adapter(&self) -> &SignalAdapter<Arc<Bus>, Arc<ControlTree>> {
        &self.adapter
    }

    /// Добавляет элемент, реализующий [`crate::pubsub::Subscriber`].
    pub fn add_control(
        &self,
        control: SubscriberRef,
    ) {
        self.controls().insert(control);
    }

    /// Добавляет старый элемент, принимающий только сигналы; доставка идёт
    /// по соглашению из настроек.
    pub fn add_signal_control<S>(
        &self,
        name: impl Into<String>,
        sink: S,
    ) where
        S: SignalSink + 'static,
    {
        let bridge = NotifyBridge::new(name, sink, self.convention.clone());
        self.add_control(Arc::new(bridge));
    }

    pub fn remove_control(
        &self,
        name: &str,
    ) -> bool {
        self.controls().remove(name).is_some()
    }

    pub fn notify(
        &self,
        key: &str,
        data: &Value,
    ) {
        self.adapter.notify(key, data);
    }

    pub fn try_notify(
        &self,
        key: &str,
        data: &Value,
    ) -> Result<SignalOutcome, panelbus_error::SignalError> {
        self.adapter.try_notify(key, data)
    }
}
