//! Logging setup.
//!
//! The display owns the terminal, so log output never goes to stdout or
//! stderr. Logging is enabled only when a log file is given, and writes
//! through a non-blocking appender so a slow disk cannot stall a frame.

use crate::error::{ConfigError, Error};
use std::fs::OpenOptions;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "LANESCOPE_LOG";

/// Filter used when neither a directive nor the environment sets one.
pub const DEFAULT_FILTER: &str = "info";

/// Build the log filter.
///
/// An explicit directive wins; otherwise `LANESCOPE_LOG`, then `RUST_LOG`,
/// then [`DEFAULT_FILTER`].
pub fn build_filter(directive: Option<&str>) -> Result<EnvFilter, ConfigError> {
    if let Some(directive) = directive {
        return EnvFilter::try_new(directive).map_err(|source| ConfigError::InvalidLogFilter {
            directive: directive.to_string(),
            source,
        });
    }
    Ok(EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
}

/// Install a global subscriber appending plain-text events to `path`.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes buffered events.
pub fn init_logging(path: &Path, directive: Option<&str>) -> Result<WorkerGuard, Error> {
    let filter = build_filter(directive)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_thread_names(true),
        )
        .try_init()?;

    Ok(guard)
}
