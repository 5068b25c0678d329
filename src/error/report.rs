use panelbus_error::{ErrorExt, LogLevel};

/// Записывает восстановленную ошибку в лог с уровнем, который диктует её
/// статус-код.
///
/// Шина не пробрасывает ошибки наружу, поэтому это единственное место, где
/// они становятся видимы.
pub fn report(err: &dyn ErrorExt) {
    let code = err.status_code();
    let kind = err.type_name();
    match err.log_level() {
        LogLevel::Trace => tracing::trace!(code = %code, kind = %kind, "{err}"),
        LogLevel::Debug => tracing::debug!(code = %code, kind = %kind, "{err}"),
        LogLevel::Info => tracing::info!(code = %code, kind = %kind, "{err}"),
        LogLevel::Warn => tracing::warn!(code = %code, kind = %kind, "{err}"),
        LogLevel::Error => {
            tracing::error!(code = %code, kind = %kind, details = %err.log_message(), "{err}")
        }
    }
}
