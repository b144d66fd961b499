//! Telemetry configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Configuration for console logging.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to write JSON formatted logs
    pub json_logs: bool,

    /// File receiving log output. The terminal belongs to the UI.
    pub log_file: PathBuf,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "rover-console".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            log_file: PathBuf::from("rover-console.log"),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ROVER_SERVICE_NAME`: Service name (default: rover-console)
    /// - `ROVER_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `ROVER_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `ROVER_LOG_FILE`: Log file path (default: rover-console.log)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service_name: env::var("ROVER_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: env::var("ROVER_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: env::var("ROVER_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.json_logs),

            log_file: env::var("ROVER_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }

    /// Override the log file location.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
