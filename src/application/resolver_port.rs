//! Интерфейс (порт) поиска элементов панели по имени.

use std::sync::Arc;

use crate::pubsub::SubscriberRef;

pub trait ControlResolver: Send + Sync {
    /// Подписчик с данным именем, если он есть в дереве панели.
    fn resolve(
        &self,
        name: &str,
    ) -> Option<SubscriberRef>;
}

impl<R: ControlResolver + ?Sized> ControlResolver for Arc<R> {
    fn resolve(
        &self,
        name: &str,
    ) -> Option<SubscriberRef> {
        (**self).resolve(name)
    }
}
