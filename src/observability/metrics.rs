//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webdriver_requests_total` (counter): dispatches by method, status, handler
//! - `webdriver_request_duration_seconds` (histogram): dispatch latency
//!
//! # Design Decisions
//! - Recording is cheap atomic work; safe on every dispatch
//! - The Prometheus exporter is optional and config-gated; without it the
//!   macros write into a no-op recorder

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_exporter(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

/// Record one dispatch outcome.
pub fn record_dispatch(method: &str, status: u16, handler: &'static str, start: Instant) {
    metrics::counter!(
        "webdriver_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "handler" => handler,
    )
    .increment(1);

    metrics::histogram!(
        "webdriver_request_duration_seconds",
        "handler" => handler,
    )
    .record(start.elapsed().as_secs_f64());
}
