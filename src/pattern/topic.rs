use globset::{Glob, GlobMatcher};

use super::{MatchMode, Pattern};
use crate::error::PatternError;

/// Шаблон подписки, скомпилированный под свой [`MatchMode`].
#[derive(Debug, Clone)]
pub enum TopicMatcher {
    /// Lua-шаблон: поиск подстроки или полное совпадение
    Lua { pattern: Pattern, full: bool },
    /// Glob по всей теме
    Glob(GlobMatcher),
}

impl TopicMatcher {
    pub fn compile(
        source: &str,
        mode: MatchMode,
    ) -> Result<Self, PatternError> {
        Ok(match mode {
            MatchMode::Partial => TopicMatcher::Lua {
                pattern: Pattern::new(source)?,
                full: false,
            },
            MatchMode::Anchored => TopicMatcher::Lua {
                pattern: Pattern::new(source)?,
                full: true,
            },
            MatchMode::Glob => TopicMatcher::Glob(Glob::new(source)?.compile_matcher()),
        })
    }

    pub fn mode(&self) -> MatchMode {
        match self {
            TopicMatcher::Lua { full: false, .. } => MatchMode::Partial,
            TopicMatcher::Lua { full: true, .. } => MatchMode::Anchored,
            TopicMatcher::Glob(_) => MatchMode::Glob,
        }
    }

    /// Совпадает ли тема. Ошибка возможна только у Lua-шаблона, который
    /// оказался слишком сложным для конкретной темы.
    pub fn matches(
        &self,
        topic: &str,
    ) -> Result<bool, PatternError> {
        match self {
            TopicMatcher::Lua { pattern, full: false } => pattern.is_match(topic),
            TopicMatcher::Lua { pattern, full: true } => pattern.is_full_match(topic),
            TopicMatcher::Glob(matcher) => Ok(matcher.is_match(topic)),
        }
    }
}
