use std::io::{self, Stderr};

use tracing_subscriber::{registry::LookupSpan, Layer};

use crate::logging::{config::LoggingConfig, formatter};

/// Слой консоли. Пишет в stderr: stdout занят выводом команд.
pub fn layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let writer: fn() -> Stderr = io::stderr;
    formatter::build_formatter(config, writer, config.with_ansi)
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::{prelude::*, registry::Registry};

    use super::*;
    use crate::logging::LogFormat;

    /// Тест проверяет, что слой консоли регистрируется в Registry и
    /// логирование через него не паникует.
    #[test]
    fn test_layer_registers_and_logs_without_panic() {
        for format in [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json] {
            let config = LoggingConfig {
                format,
                with_ansi: false,
                ..Default::default()
            };
            let subscriber = Registry::default().with(layer::<Registry>(&config));
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(%format, "console layer test message");
            });
        }
    }
}
