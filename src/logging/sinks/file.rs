use std::fs;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{registry::LookupSpan, Layer};

use crate::logging::{
    config::{FileSinkConfig, LoggingConfig},
    formatter, LoggingError,
};

/// Файловый слой с ежедневной ротацией и неблокирующей записью.
///
/// `WorkerGuard` должен жить до конца работы: при его освобождении
/// дописываются буферизованные события.
pub fn layer<S>(
    config: &LoggingConfig,
    file: &FileSinkConfig,
) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard), LoggingError>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(&file.dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&file.prefix)
        .filename_suffix("log")
        .build(&file.dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    Ok((formatter::build_formatter(config, writer, false), guard))
}
