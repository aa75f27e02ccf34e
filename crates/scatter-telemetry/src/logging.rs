//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and either a
//! pretty console layer (development) or a JSON layer (containers). JSON
//! lines carry the structured fields the client emits, e.g. `request_id`,
//! `kind` and `endpoint`, so replies can be correlated from log output alone.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Handle returned once the global subscriber is installed.
#[derive(Debug)]
pub struct StructuredLogger {
    service_name: String,
    json: bool,
}

impl StructuredLogger {
    /// Service name the logger was configured with.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Whether log lines are emitted as JSON.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level` when set. Fails with
/// [`TelemetryError::LoggingInit`] if a global subscriber already exists.
pub fn init_logging(config: &TelemetryConfig) -> Result<StructuredLogger, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    let (pretty_layer, json_layer) = match (config.console_output, config.json_logs) {
        (false, _) => (None, None),
        (true, true) => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(config.source_locations)
                    .with_line_number(config.source_locations),
            ),
        ),
        (true, false) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(config.source_locations)
                    .with_line_number(config.source_locations)
                    .with_ansi(true),
            ),
            None,
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Structured logging initialized"
    );

    Ok(StructuredLogger {
        service_name: config.service_name.clone(),
        json: config.json_logs,
    })
}
