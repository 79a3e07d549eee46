//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by service, route, status
//! - `http_request_duration_seconds` (histogram): latency by service, route
//! - `video_fetch_total` (counter): downstream lookups by outcome
//! - `playlist_truncations_total` (counter): playlists cut short
//! - `playlist_store_fallbacks_total` (counter): empty-collection fallbacks
//! - `video_lookup_total` (counter): store lookups by outcome
//! - `injected_faults_total` (counter): faults by kind
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(service: &'static str, route: &'static str, status: u16, start: Instant) {
    counter!(
        "http_requests_total",
        "service" => service,
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "service" => service,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}

/// Outcome is one of `resolved`, `not_found`, `failed`.
pub fn record_video_fetch(outcome: &'static str) {
    counter!("video_fetch_total", "outcome" => outcome).increment(1);
}

pub fn record_truncation() {
    counter!("playlist_truncations_total").increment(1);
}

pub fn record_store_fallback() {
    counter!("playlist_store_fallbacks_total").increment(1);
}

/// Outcome is one of `found`, `not_found`, `error`.
pub fn record_video_lookup(outcome: &'static str) {
    counter!("video_lookup_total", "outcome" => outcome).increment(1);
}

/// Kind is `flaky` or `delay`.
pub fn record_fault(kind: &'static str) {
    counter!("injected_faults_total", "kind" => kind).increment(1);
}
