//! Шаблоны тем.
//!
//! Диалект совпадает с шаблонами Lua (`string.find`): классы `%a %c %d %g %l
//! %p %s %u %w %x` и их заглавные дополнения, `.`, наборы `[...]`/`[^...]`,
//! квантификаторы `* + - ?`, якоря `^`/`$`, захваты `(...)` и `()`, обратные
//! ссылки `%1`..`%9`, `%bxy` и `%f[set]`. Это не регулярные выражения: нет
//! альтернативы `|` и квантификаторов у групп.
//!
//! - `class`: одиночные элементы и классы символов.
//! - `parser`: разбор и проверка шаблона.
//! - `matcher`: сопоставление с возвратами.
//! - `topic`: выбор диалекта по [`MatchMode`] для подписок.

pub mod class;
mod matcher;
mod parser;
pub mod topic;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use matcher::{Capture, Match};
pub use topic::TopicMatcher;

use crate::error::PatternError;

/// Как шаблон подписки сопоставляется с темой.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Совпадение в любом месте темы (поведение по умолчанию)
    #[default]
    Partial,
    /// Шаблон должен покрыть тему целиком
    Anchored,
    /// Glob по всей теме (`*`, `?`, `[...]`, `{a,b}`)
    Glob,
}

impl fmt::Display for MatchMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            MatchMode::Partial => "partial",
            MatchMode::Anchored => "anchored",
            MatchMode::Glob => "glob",
        })
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "partial" => Ok(MatchMode::Partial),
            "anchored" | "full" => Ok(MatchMode::Anchored),
            "glob" => Ok(MatchMode::Glob),
            other => Err(format!(
                "unknown match mode '{other}' (expected partial, anchored or glob)"
            )),
        }
    }
}

/// Скомпилированный шаблон.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    program: parser::Program,
}

impl Pattern {
    /// Разбирает шаблон. Ошибка возвращается для любого синтаксического
    /// дефекта, даже если до него сопоставление никогда не дошло бы.
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let program = parser::parse(source.as_bytes())?;
        Ok(Self {
            source: source.to_string(),
            program,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Шаблон без спецсимволов ищется как обычная подстрока.
    pub fn is_literal(&self) -> bool {
        self.program.literal.is_some()
    }

    /// Число захватов `(...)` и `()`.
    pub fn captures_len(&self) -> usize {
        self.program.captures
    }

    /// Первое совпадение в любом месте темы.
    pub fn find(
        &self,
        subject: &str,
    ) -> Result<Option<Match>, PatternError> {
        matcher::find(&self.program, subject.as_bytes(), false)
    }

    /// Совпадение, покрывающее всю тему.
    pub fn find_full(
        &self,
        subject: &str,
    ) -> Result<Option<Match>, PatternError> {
        matcher::find(&self.program, subject.as_bytes(), true)
    }

    pub fn is_match(
        &self,
        subject: &str,
    ) -> Result<bool, PatternError> {
        Ok(self.find(subject)?.is_some())
    }

    pub fn is_full_match(
        &self,
        subject: &str,
    ) -> Result<bool, PatternError> {
        Ok(self.find_full(subject)?.is_some())
    }
}

impl fmt::Display for Pattern {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::new(s)
    }
}
