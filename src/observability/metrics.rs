//! Prometheus metrics for the gateway itself.
//!
//! # Metrics
//! - `gateway_rpc_requests_total` (counter): `/rpc` requests by kind, outcome
//! - `gateway_rpc_request_duration_seconds` (histogram): latency by kind
//! - `gateway_rpc_calls_tracked_total` (counter): individual calls counted
//! - `gateway_upstream_failures_total` (counter): forward failures by reason
//!
//! Method names are not used as labels; per-method counts live in the
//! `MethodRegistry` behind `/metrics`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder with its own HTTP listener.
///
/// Fails when the address cannot be bound or a recorder is already installed.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus exporter listening");
    Ok(())
}

/// Record a finished `/rpc` request.
pub fn record_rpc_request(kind: &'static str, outcome: &'static str, start: Instant) {
    counter!("gateway_rpc_requests_total", "kind" => kind, "outcome" => outcome).increment(1);
    histogram!("gateway_rpc_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

/// Record calls added to the method registry.
pub fn record_tracked_calls(count: u64) {
    counter!("gateway_rpc_calls_tracked_total").increment(count);
}

/// Record a failed upstream exchange.
pub fn record_upstream_failure(reason: &'static str) {
    counter!("gateway_upstream_failures_total", "reason" => reason).increment(1);
}
