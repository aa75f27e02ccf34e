//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to log lines
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to write log lines to stdout at all
    pub console_output: bool,

    /// Whether to emit JSON formatted logs instead of pretty output
    pub json_logs: bool,

    /// Whether to include source file and line in log lines
    pub source_locations: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "scatter-dapp".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            source_locations: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SCATTER_SERVICE_NAME`: Service name (default: scatter-dapp)
    /// - `SCATTER_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `SCATTER_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `SCATTER_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `SCATTER_SOURCE_LOCATIONS`: Include file/line (default: false)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("SCATTER_SERVICE_NAME")
                .unwrap_or_else(|_| "scatter-dapp".to_string()),

            log_level: env::var("SCATTER_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("SCATTER_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            json_logs: env::var("SCATTER_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            source_locations: env::var("SCATTER_SOURCE_LOCATIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// Configuration for test binaries: debug level, pretty output.
    pub fn for_tests() -> Self {
        Self {
            service_name: "scatter-tests".to_string(),
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value == "true" || value == "1" || value == "yes"
}
