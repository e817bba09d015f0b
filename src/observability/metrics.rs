//! Metrics collection and exposition.
//!
//! # Metrics
//! - `client_requests_total` (counter): settled client requests by method, outcome
//! - `client_request_duration_seconds` (histogram): client latency
//! - `dev_proxy_requests_total` (counter): proxied requests by prefix, status
//! - `render_errors_total` (counter): errors caught by the global handler
//!
//! # Design Decisions
//! - Outcome label is the status code, or the error kind when no response arrived
//! - The Prometheus exporter is only installed when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_client_request(method: &str, outcome: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!("client_requests_total", &labels).increment(1);
    histogram!("client_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

pub fn record_proxy_request(prefix: &str, status: u16) {
    counter!(
        "dev_proxy_requests_total",
        "prefix" => prefix.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_render_error(route: &str) {
    counter!("render_errors_total", "route" => route.to_string()).increment(1);
}
