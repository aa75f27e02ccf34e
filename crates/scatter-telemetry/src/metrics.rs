//! Prometheus metrics for the correlation client.
//!
//! All metrics follow the naming convention: `scatter_dapp_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., requests_sent_total)
//! - **Gauge**: Value that can go up or down (e.g., pending_requests)
//! - **Histogram**: Distribution of values (e.g., reply_latency_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // REQUEST METRICS
    // =========================================================================

    /// Requests handed to the stream adapter, by request kind
    pub static ref REQUESTS_SENT: CounterVec = CounterVec::new(
        Opts::new("scatter_dapp_requests_sent_total", "Requests handed to the encrypted stream"),
        &["kind"]
    ).expect("metric creation failed");

    /// Requests settled through the failure channel, by reason
    pub static ref REQUESTS_FAILED: CounterVec = CounterVec::new(
        Opts::new("scatter_dapp_requests_failed_total", "Requests failed before a reply arrived"),
        &["reason"]  // reason: timeout/disconnected/send_failed
    ).expect("metric creation failed");

    /// Currently outstanding requests
    pub static ref PENDING_REQUESTS: Gauge = Gauge::new(
        "scatter_dapp_pending_requests",
        "Requests registered and still awaiting a reply"
    ).expect("metric creation failed");

    // =========================================================================
    // DISPATCH METRICS
    // =========================================================================

    /// Replies routed to a pending request, by request kind
    pub static ref REPLIES_ROUTED: CounterVec = CounterVec::new(
        Opts::new("scatter_dapp_replies_routed_total", "Inbound replies matched to a pending request"),
        &["kind"]
    ).expect("metric creation failed");

    /// Replies with no matching pending request
    pub static ref REPLIES_DROPPED: Counter = Counter::new(
        "scatter_dapp_replies_dropped_total",
        "Inbound replies dropped for unknown or settled identifiers"
    ).expect("metric creation failed");

    /// Handshake acknowledgements committed
    pub static ref SYNC_COMMITS: Counter = Counter::new(
        "scatter_dapp_sync_commits_total",
        "Sync acknowledgements routed to the stream adapter"
    ).expect("metric creation failed");

    /// Time between registering a request and settling it
    pub static ref REPLY_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "scatter_dapp_reply_latency_seconds",
            "Time from request registration to reply settlement"
        ).buckets(exponential_buckets(0.001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Handle proving the metrics were registered.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Fails if called twice in the same process.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(REQUESTS_SENT.clone()),
        Box::new(REQUESTS_FAILED.clone()),
        Box::new(PENDING_REQUESTS.clone()),
        Box::new(REPLIES_ROUTED.clone()),
        Box::new(REPLIES_DROPPED.clone()),
        Box::new(SYNC_COMMITS.clone()),
        Box::new(REPLY_LATENCY.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all registered metrics in Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
