//! Metrics Module
//!
//! Prometheus request and sweep metrics. A single `Metrics` value owns its
//! own registry; it is created at startup and handed to the router state and
//! the cleanup task, so nothing is registered globally.

use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Latency buckets in seconds.
const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

// == Metrics ==
/// Shared observability sink backed by a private `Registry`.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    /// Handled requests by method, matched path and status code
    pub http_requests: IntCounterVec,
    /// Request latency by method and matched path
    pub http_request_duration: HistogramVec,
    /// Completed cleanup sweeps
    pub cleanup_runs: IntCounter,
    /// Items reclaimed by cleanup sweeps
    pub cleanup_deleted_items: IntCounter,
}

impl Metrics {
    // == Constructor ==
    /// Creates a fresh registry and registers every metric on it.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests handled"),
            &["method", "path", "status"],
        )?;
        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "path"],
        )?;
        let cleanup_runs = IntCounter::new("cleanup_runs_total", "Total cleanup sweeps run")?;
        let cleanup_deleted_items = IntCounter::new(
            "cleanup_deleted_items_total",
            "Total expired items removed by cleanup sweeps",
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(cleanup_runs.clone()))?;
        registry.register(Box::new(cleanup_deleted_items.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_request_duration,
            cleanup_runs,
            cleanup_deleted_items,
        })
    }

    // == Record Request ==
    /// Records one handled request under its matched path.
    pub fn record_request(&self, method: &str, path: &str, status: u16, latency: Duration) {
        let status = status.to_string();
        self.http_requests
            .with_label_values(&[method, path, status.as_str()])
            .inc();
        self.http_request_duration
            .with_label_values(&[method, path])
            .observe(latency.as_secs_f64());
    }

    // == Record Sweep ==
    /// Records one sweep and the number of items it reclaimed.
    pub fn record_sweep(&self, reclaimed: usize) {
        self.cleanup_runs.inc();
        self.cleanup_deleted_items.inc_by(reclaimed as u64);
    }

    // == Encode ==
    /// Renders every registered metric in the Prometheus text format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}
