//! File-backed structured logging.
//!
//! The console owns the terminal, so log lines go to a file:
//! - pretty single-line output for development
//! - JSON output when `json_logs` is set, one object per line with
//!   `timestamp`, `level`, `target`, `fields.component` and the message

use std::fs::{self, File, OpenOptions};
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::{TelemetryConfig, TelemetryError};

/// Open (append) the configured log file, creating parent directories.
pub(crate) fn open_log_file(config: &TelemetryConfig) -> Result<File, TelemetryError> {
    if let Some(parent) = config.log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TelemetryError::LogFile {
                path: config.log_file.clone(),
                source: e,
            })?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|e| TelemetryError::LogFile {
            path: config.log_file.clone(),
            source: e,
        })
}

/// Build the subscriber without installing it.
pub(crate) fn build_subscriber(
    config: &TelemetryConfig,
    file: File,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Filter(e.to_string()))?;

    let writer = Mutex::new(file);

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(writer)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .boxed()
    };

    Ok(Box::new(
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(env_filter),
    ))
}

/// Helper to create structured log entries stamped with the console component.
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}
