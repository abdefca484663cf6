//! Tracing subscriber setup for the binary

use std::ffi::OsStr;
use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV_VAR;

/// Errors encountered while configuring logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to prepare log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Build the log filter: `LSP_SETTINGS_LOG` wins over the configured level
fn build_filter(
    env_directives: Option<String>,
    default_level: &str,
) -> Result<EnvFilter, LoggingError> {
    let directives = env_directives.unwrap_or_else(|| default_level.to_string());
    EnvFilter::try_new(&directives).map_err(|e| LoggingError::Filter(e.to_string()))
}

/// Install a JSON subscriber writing to `log_path`
///
/// Keep the returned guard alive for the lifetime of the process; dropping it
/// flushes and stops the background writer.
pub fn init_logging(log_path: &Path, default_level: &str) -> Result<WorkerGuard, LoggingError> {
    let filter = build_filter(std::env::var(LOG_ENV_VAR).ok(), default_level)?;

    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(log_dir)?;
    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| OsStr::new("lsp-settings.log"));

    let appender = tracing_appender::rolling::never(log_dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Subscriber(e.to_string()))?;

    Ok(guard)
}
