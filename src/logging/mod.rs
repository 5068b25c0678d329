//! Логирование на `tracing`.
//!
//! - `config`: секция `logging` настроек.
//! - `filters` (приватный): `EnvFilter` из `RUST_LOG` или конфигурации.
//! - `formatter` (приватный): слой fmt в формате pretty/compact/json.
//! - `handle`: [`LoggingHandle`], владелец guard файлового слоя.
//! - `sinks`: консоль (stderr) и файл с ежедневной ротацией.

pub mod config;
mod filters;
mod formatter;
pub mod handle;
pub mod sinks;

pub use config::{FileSinkConfig, LogFormat, LoggingConfig};
pub use handle::LoggingHandle;
use thiserror::Error;
use tracing_subscriber::{
    layer::{Layered, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer, Registry,
};

/// Ошибки инициализации логирования.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),
    #[error("invalid log format '{0}' (expected pretty, compact or json)")]
    InvalidFormat(String),
    #[error("log file prefix must not be empty")]
    EmptyFilePrefix,
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to open log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),
    #[error("global subscriber already set: {0}")]
    Init(#[from] TryInitError),
}

type Filtered = Layered<EnvFilter, Registry>;

/// Инициализация логирования с конфигурацией.
///
/// Устанавливает глобальный subscriber; повторный вызов возвращает
/// [`LoggingError::Init`].
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingHandle, LoggingError> {
    config.validate()?;

    let env_filter = filters::build_filter_from_config(config);
    let mut layers: Vec<Box<dyn Layer<Filtered> + Send + Sync>> = Vec::new();

    if config.console {
        layers.push(sinks::console::layer(config));
    }

    let file_guard = match &config.file {
        Some(file) => {
            let (layer, guard) = sinks::file::layer(config, file)?;
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = %config.format,
        console = config.console,
        file = config.file.as_ref().map(|f| f.dir.display().to_string()),
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}
