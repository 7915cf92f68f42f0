//! Prometheus metrics for order execution.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A registration failure means a
//! duplicate metric name, which is a programming error surfaced on first use.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{TelemetryError, TelemetryResult};

/// REST requests by outcome.
/// Labels: method, path, outcome (ok/status/api/timeout/transport/decode)
pub static REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "bfx_requests_total",
        "Total REST requests sent to the venue",
        &["method", "path", "outcome"]
    )
    .unwrap()
});

/// REST round-trip latency in milliseconds.
pub static REQUEST_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "bfx_request_latency_ms",
        "REST round-trip latency in milliseconds",
        &["method", "path"],
        vec![10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// TWAP slices by outcome (placed/failed).
pub static TWAP_SLICES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "bfx_twap_slices_total",
        "Total TWAP slices attempted",
        &["outcome"]
    )
    .unwrap()
});

/// Grid legs by side and outcome.
pub static GRID_ORDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "bfx_grid_orders_total",
        "Total grid ladder orders attempted",
        &["side", "outcome"]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a completed request.
    pub fn request(method: &str, path: &str, outcome: &str, latency_ms: f64) {
        REQUESTS_TOTAL
            .with_label_values(&[method, path, outcome])
            .inc();
        REQUEST_LATENCY_MS
            .with_label_values(&[method, path])
            .observe(latency_ms);
    }

    pub fn twap_slice_placed() {
        TWAP_SLICES_TOTAL.with_label_values(&["placed"]).inc();
    }

    pub fn twap_slice_failed() {
        TWAP_SLICES_TOTAL.with_label_values(&["failed"]).inc();
    }

    pub fn grid_order(side: &str, placed: bool) {
        let outcome = if placed { "placed" } else { "failed" };
        GRID_ORDERS_TOTAL.with_label_values(&[side, outcome]).inc();
    }

    /// Text exposition of every registered metric.
    pub fn render() -> TelemetryResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buf)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
