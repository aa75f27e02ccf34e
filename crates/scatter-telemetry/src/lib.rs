//! # Scatter Telemetry
//!
//! Logging and metrics for the `scatter-dapp` correlation client.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with env filtering, pretty or JSON output
//! - **Metrics**: Prometheus counters, gauges and histograms for request flow
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scatter_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! // requests, replies and handshakes are now logged and counted
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SCATTER_SERVICE_NAME` | `scatter-dapp` | Service name in log lines |
//! | `SCATTER_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `SCATTER_CONSOLE_OUTPUT` | `true` | Write log lines to stdout |
//! | `SCATTER_JSON_LOGS` | `false` | JSON log lines (default on in containers) |
//! | `SCATTER_SOURCE_LOCATIONS` | `false` | Include file and line numbers |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, StructuredLogger};
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, PENDING_REQUESTS, REPLIES_DROPPED,
    REPLIES_ROUTED, REPLY_LATENCY, REQUESTS_FAILED, REQUESTS_SENT, SYNC_COMMITS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize metrics and logging.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first, they cannot fail on subscriber state
    let metrics = register_metrics()?;
    let logger = init_logging(&config)?;

    Ok(TelemetryGuard {
        _metrics: metrics,
        logger,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
    logger: StructuredLogger,
}

impl TelemetryGuard {
    /// The installed logger.
    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.logger.service_name(), "Shutting down telemetry");
    }
}
