use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Weak,
    },
};

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use super::{Subscriber, SubscriberRef};
use crate::{
    error::PatternError,
    pattern::{MatchMode, TopicMatcher},
};

/// Идентификатор подписки для `unsubscribe`.
///
/// Выдаётся по возрастанию и не переиспользуется в пределах одного
/// реестра, поэтому порядок идентификаторов совпадает с порядком вставки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Запись реестра: шаблон и слабая ссылка на подписчика.
///
/// После вставки запись не меняется; `matcher` лишь кэширует результат
/// первой компиляции шаблона, включая ошибку.
pub struct Subscription {
    id: SubscriptionId,
    pattern: String,
    mode: MatchMode,
    subscriber: Weak<dyn Subscriber>,
    subscriber_name: String,
    matcher: OnceCell<Result<TopicMatcher, PatternError>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Имя подписчика на момент подписки.
    pub fn subscriber_name(&self) -> &str {
        &self.subscriber_name
    }

    /// Подписчик, если хост его ещё не освободил.
    pub fn subscriber(&self) -> Option<SubscriberRef> {
        self.subscriber.upgrade()
    }

    /// Совпадает ли тема с шаблоном. Шаблон компилируется при первом
    /// вызове, битый шаблон возвращает одну и ту же ошибку каждый раз.
    pub fn matches(
        &self,
        topic: &str,
    ) -> Result<bool, PatternError> {
        let compiled = self
            .matcher
            .get_or_init(|| TopicMatcher::compile(&self.pattern, self.mode));
        match compiled {
            Ok(matcher) => matcher.matches(topic),
            Err(err) => Err(err.clone()),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .field("mode", &self.mode)
            .field("subscriber", &self.subscriber_name)
            .finish()
    }
}

type Entries = Arc<Vec<Arc<Subscription>>>;

/// Упорядоченный реестр подписок.
///
/// Читатели получают снимок (`Arc` на вектор) и работают без блокировки;
/// писатель копирует вектор только если снимок сейчас кем-то удерживается.
#[derive(Default)]
pub struct Registry {
    entries: RwLock<Entries>,
    next_id: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет подписку в конец реестра. Дубликаты не отсеиваются.
    pub fn insert(
        &self,
        pattern: impl Into<String>,
        mode: MatchMode,
        subscriber: &SubscriberRef,
    ) -> SubscriptionId {
        // Идентификатор выдаётся под блокировкой записи, чтобы вектор
        // оставался отсортированным по id.
        let mut entries = self.entries.write();
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = Arc::new(Subscription {
            id,
            pattern: pattern.into(),
            mode,
            subscriber: Arc::downgrade(subscriber),
            subscriber_name: subscriber.name().to_string(),
            matcher: OnceCell::new(),
        });
        Arc::make_mut(&mut *entries).push(entry);
        id
    }

    /// Удаляет подписку по идентификатору.
    pub fn remove(
        &self,
        id: SubscriptionId,
    ) -> Option<Arc<Subscription>> {
        let mut entries = self.entries.write();
        let index = entries.binary_search_by_key(&id, |e| e.id).ok()?;
        Some(Arc::make_mut(&mut *entries).remove(index))
    }

    /// Очищает реестр. Идентификаторы продолжают расти.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let removed = entries.len();
        *entries = Arc::default();
        removed
    }

    /// Снимок реестра на момент вызова.
    pub fn snapshot(&self) -> Entries {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_list().entries(self.snapshot().iter()).finish()
    }
}
