//! Structured logging of errors
//!
//! `env_logger`-based initialization plus helpers that emit an error's
//! effective fields through both the `log` facade and `tracing`.

use super::keys;
use super::types::Error;
use ctxerr_context::Map;
use log::{Level, info, log};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging helpers for [`Error`]
pub struct ErrorLogger;

impl ErrorLogger {
    /// Initialize logging (call once at application startup)
    ///
    /// Levels come from `RUST_LOG`, e.g. `RUST_LOG=ctxerr=trace` shows
    /// registry evictions.
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("structured error logging initialized");
        });
    }

    /// Initialize logging for test environments
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log `error` at error level with its effective fields
    pub fn log_error(error: &Error) {
        Self::log_at(Level::Error, error);
    }

    /// Log `error` at `level` with its effective fields
    pub fn log_at(level: Level, error: &Error) {
        let data = error.data();
        match data.get(keys::OP).and_then(|op| op.as_str()) {
            Some(op) => log!(
                level,
                "{} (op: {op}) {}",
                error.message(),
                Self::format_fields(&data)
            ),
            None => log!(level, "{} {}", error.message(), Self::format_fields(&data)),
        }
    }

    /// Emit `error` as a `tracing` event with its fields as JSON
    pub fn trace_error(error: &Error) {
        let data = error.data();
        let op = data.get(keys::OP).and_then(|op| op.as_str()).unwrap_or_default();
        let fields = serde_json::to_string(&data).unwrap_or_default();
        tracing::error!(
            error.id = error.id(),
            error.op = op,
            error.location = %error.call_stack().innermost(),
            error.fields = %fields,
            "{}",
            error.message()
        );
    }

    /// Render fields as space-separated `key=value` pairs, reserved keys skipped
    #[must_use]
    pub fn format_fields(data: &Map) -> String {
        data.iter()
            .filter(|(key, _)| !matches!(key.as_str(), keys::OP | keys::MESSAGE))
            .map(|(key, value)| match value.as_str() {
                Some(text) => format!("{key}={text:?}"),
                None => format!("{key}={value}"),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_render_sorted_and_quoted() {
        let mut data = Map::new();
        data.insert("b".into(), json!(2));
        data.insert("a".into(), json!("text"));
        data.insert(keys::OP.into(), json!("skipped"));
        data.insert(keys::MESSAGE.into(), json!("skipped"));
        assert_eq!(ErrorLogger::format_fields(&data), r#"a="text" b=2"#);
    }

    #[test]
    fn logging_an_error_does_not_panic() {
        ErrorLogger::init_test();

        let e = Error::new("write failed").op("flush").with("bytes", 12);
        ErrorLogger::log_error(&e);
        ErrorLogger::log_at(Level::Warn, &e);
        ErrorLogger::trace_error(&e);
    }
}
