use dashmap::DashMap;

use crate::{application::ControlResolver, pubsub::SubscriberRef};

/// Именованные элементы панели.
///
/// Дерево владеет подписчиками: шина держит только слабые ссылки, поэтому
/// удалённый из дерева элемент перестаёт получать сообщения.
#[derive(Default)]
pub struct ControlTree {
    controls: DashMap<String, SubscriberRef>,
}

impl ControlTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет элемент под его собственным именем и возвращает прежний
    /// элемент с тем же именем.
    pub fn insert(
        &self,
        control: SubscriberRef,
    ) -> Option<SubscriberRef> {
        let name = control.name().to_string();
        self.insert_as(name, control)
    }

    pub fn insert_as(
        &self,
        name: impl Into<String>,
        control: SubscriberRef,
    ) -> Option<SubscriberRef> {
        self.controls.insert(name.into(), control)
    }

    pub fn remove(
        &self,
        name: &str,
    ) -> Option<SubscriberRef> {
        self.controls.remove(name).map(|(_, control)| control)
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.controls.contains_key(name)
    }

    /// Имена элементов в отсортированном порядке.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.controls.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

impl ControlResolver for ControlTree {
    fn resolve(
        &self,
        name: &str,
    ) -> Option<SubscriberRef> {
        self.controls.get(name).map(|entry| entry.value().clone())
    }
}

impl std::fmt::Debug for ControlTree {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ControlTree")
            .field("controls", &self.names())
            .finish()
    }
}
