//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): API requests by method, status, route
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_upstream_errors_total` (counter): failed upstream calls by kind
//! - `gateway_gate_redirects_total` (counter): session gate redirects by reason
//! - `gateway_upstream_unauthorized_total` (counter): upstream 401 answers
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests need no setup
//! - Route label is the matched public pattern, never the raw path

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed API request.
pub fn record_request(method: &str, status: u16, route: &'static str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream call that produced no usable response.
pub fn record_upstream_error(kind: &'static str) {
    counter!("gateway_upstream_errors_total", "kind" => kind).increment(1);
}

/// Record a gate redirect.
pub fn record_gate_redirect(reason: &'static str) {
    counter!("gateway_gate_redirects_total", "reason" => reason).increment(1);
}

pub fn record_upstream_unauthorized() {
    counter!("gateway_upstream_unauthorized_total").increment(1);
}
