use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

use super::LoggingError;

/// Формат вывода событий.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Многострочный, для разработки
    Pretty,
    /// Одна строка на событие
    #[default]
    Compact,
    /// JSON, по объекту на строку
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::InvalidFormat(other.to_string())),
        }
    }
}

/// Файл с ежедневной ротацией.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSinkConfig {
    pub dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub prefix: String,
}

fn default_file_prefix() -> String {
    "panelbus".to_string()
}

/// Конфигурация логирования (секция `logging`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Базовый уровень: `trace`, `debug`, `info`, `warn`, `error`, `off`
    pub level: String,
    pub format: LogFormat,
    /// Писать в stderr
    pub console: bool,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    /// Дополнительные директивы `EnvFilter`, например `panelbus::pubsub=trace`
    pub directives: Vec<String>,
    pub file: Option<FileSinkConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            console: true,
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            directives: Vec::new(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Строка директив для `EnvFilter`.
    pub fn build_filter_directive(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        self.level
            .parse::<LevelFilter>()
            .map_err(|_| LoggingError::InvalidLevel(self.level.clone()))?;
        if let Some(file) = &self.file {
            if file.prefix.is_empty() {
                return Err(LoggingError::EmptyFilePrefix);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_joins_extra_directives() {
        let config = LoggingConfig {
            level: "warn".into(),
            directives: vec!["panelbus::pubsub=trace".into()],
            ..Default::default()
        };
        assert_eq!(config.build_filter_directive(), "warn,panelbus::pubsub=trace");
        assert_eq!(LoggingConfig::default().build_filter_directive(), "info");
    }

    #[test]
    fn test_validate() {
        assert!(LoggingConfig::default().validate().is_ok());

        let bad_level = LoggingConfig {
            level: "loud".into(),
            ..Default::default()
        };
        assert!(matches!(
            bad_level.validate(),
            Err(LoggingError::InvalidLevel(level)) if level == "loud"
        ));

        let bad_file = LoggingConfig {
            file: Some(FileSinkConfig {
                dir: "logs".into(),
                prefix: String::new(),
            }),
            ..Default::default()
        };
        assert!(matches!(
            bad_file.validate(),
            Err(LoggingError::EmptyFilePrefix)
        ));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
