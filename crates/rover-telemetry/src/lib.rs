//! # Rover Telemetry
//!
//! Logging setup shared by the rover console binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rover_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::from_env())?;
//! rover_telemetry::log_event!(info, "telemetry", "status refreshed", battery = 87);
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ROVER_SERVICE_NAME` | `rover-console` | Service name in the startup line |
//! | `ROVER_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `ROVER_JSON_LOGS` | `false` | JSON lines instead of pretty output |
//! | `ROVER_LOG_FILE` | `rover-console.log` | Log destination |

mod config;
mod logging;

use std::path::PathBuf;

pub use config::TelemetryConfig;

use thiserror::Error;
use tracing::Subscriber;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("A global subscriber is already installed")]
    AlreadyInitialized,
}

/// Install the global subscriber.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let subscriber = build_subscriber(config)?;

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| TelemetryError::AlreadyInitialized)?;

    tracing::info!(
        service = %config.service_name,
        log_file = %config.log_file.display(),
        json_logs = config.json_logs,
        "Logging initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
    })
}

/// Build the file-backed subscriber without installing it.
///
/// Pair with `tracing::subscriber::with_default` to capture logs on one thread.
pub fn build_subscriber(
    config: &TelemetryConfig,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError> {
    let file = logging::open_log_file(config)?;
    logging::build_subscriber(config, file)
}

/// Guard that keeps logging active. Dropping it records the shutdown.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down");
    }
}
