//! Metrics collection and exposition.
//!
//! # Metrics
//! - `feed_requests_total` (counter): inbound feed requests by status
//! - `feed_request_duration_seconds` (histogram): time to first response
//! - `feed_cache_lookups_total` (counter): cache lookups by namespace and result
//! - `upstream_requests_total` (counter): upstream calls by endpoint and outcome
//! - `feed_late_completions_total` (counter): feeds finished after the client got 202
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests need no setup
//! - Prometheus exporter runs on its own address

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed inbound feed request.
pub fn record_request(status: u16, start: Instant) {
    let status = status.to_string();
    counter!("feed_requests_total", "status" => status.clone()).increment(1);
    histogram!("feed_request_duration_seconds", "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Record a cache lookup.
pub fn record_cache_lookup(namespace: &'static str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("feed_cache_lookups_total", "namespace" => namespace, "result" => result)
        .increment(1);
}

/// Record an upstream call outcome ("ok", "status", "transport", "decode").
pub fn record_upstream(endpoint: &'static str, outcome: &'static str) {
    counter!("upstream_requests_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
}

/// Record a feed that finished after its request had already been answered.
pub fn record_late_completion() {
    counter!("feed_late_completions_total").increment(1);
}
