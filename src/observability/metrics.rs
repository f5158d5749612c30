//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sprayproxy_inbound_requests_total` (counter): requests received for relay
//! - `sprayproxy_forwarded_requests_total` (counter): attempts, labelled by backend
//! - `sprayproxy_forwarded_response_time_seconds` (histogram): per-attempt latency

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

pub const INBOUND_REQUESTS: &str = "sprayproxy_inbound_requests_total";
pub const FORWARDED_REQUESTS: &str = "sprayproxy_forwarded_requests_total";
pub const FORWARDED_RESPONSE_TIME: &str = "sprayproxy_forwarded_response_time_seconds";

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_metrics();
            tracing::info!(address = %addr, "Metrics endpoint listening");
        }
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

fn describe_metrics() {
    describe_counter!(INBOUND_REQUESTS, "Inbound requests received for relay");
    describe_counter!(FORWARDED_REQUESTS, "Requests forwarded to a backend");
    describe_histogram!(
        FORWARDED_RESPONSE_TIME,
        Unit::Seconds,
        "Time spent waiting on a backend response"
    );
}

pub fn record_inbound() {
    counter!(INBOUND_REQUESTS).increment(1);
}

pub fn record_forwarded(backend: &str) {
    counter!(FORWARDED_REQUESTS, "backend" => backend.to_string()).increment(1);
}

pub fn record_response_time(latency: Duration) {
    histogram!(FORWARDED_RESPONSE_TIME).record(latency.as_secs_f64());
}
