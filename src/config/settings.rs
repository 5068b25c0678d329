use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{logging::LoggingConfig, pattern::MatchMode};

/// Настройки шины.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSettings {
    /// Режим сопоставления для подписок без явного режима
    pub match_mode: MatchMode,
    /// Перехватывать панику обработчика подписчика.
    ///
    /// При `false` паника обработчика выходит из `Bus::publish` наружу, и
    /// остальные подписчики этой публикации уже не вызываются. Ошибки `Err`
    /// изолируются в любом режиме.
    pub catch_panics: bool,
    /// Ключ сигнала для доставки в старые элементы панели; `None` означает,
    /// что ключом служит сама тема
    pub delivery_key: Option<String>,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Partial,
            catch_panics: true,
            delivery_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bus: BusSettings,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Загружает настройки: значения по умолчанию, затем файл (если указан),
    /// затем переменные окружения `PANELBUS__SECTION__KEY`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Значения по умолчанию
            .set_default("bus.match_mode", "partial")?
            .set_default("bus.catch_panics", true)?
            .set_default("logging.level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let cfg = builder
            // Переменные окружения с префиксом PANELBUS
            .add_source(
                Environment::with_prefix("PANELBUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
    }
}
