//! `POST /rpc` handler.
//!
//! Each request walks one path:
//!
//! ```text
//! Received → Validating → Tracking → Forwarding → Responded
//!     └──────────┴────────────────────────┴──────→ Failed (400)
//! ```
//!
//! Validation completes before anything is counted, so a rejected body never
//! touches the registry. A single upstream failure is surfaced immediately.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::error::GatewayError;
use crate::http::request::{request_id, ClientAddr};
use crate::http::response::passthrough;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::rpc::RpcPayload;

/// Proxy handler for JSON-RPC traffic.
pub async fn rpc_handler(
    State(state): State<AppState>,
    client: ClientAddr,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    // Validating
    let payload = match RpcPayload::parse(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                client = %client,
                error = %err,
                "Rejected invalid JSON-RPC request"
            );
            metrics::record_rpc_request("unknown", err.kind(), start);
            return err.into_response();
        }
    };
    let kind = payload.kind();

    // Tracking
    let tracked = track_requests(&state, &payload, &client, &request_id);
    metrics::record_tracked_calls(tracked);

    // Forwarding
    match state.forwarder.forward(&payload).await {
        Ok(upstream_body) => {
            tracing::debug!(
                request_id = %request_id,
                kind,
                calls = tracked,
                bytes = upstream_body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream responded"
            );
            metrics::record_rpc_request(kind, "ok", start);
            passthrough(upstream_body)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                upstream = %state.forwarder.url(),
                error = %e,
                "Request to Ethereum node failed"
            );
            metrics::record_upstream_failure(e.reason());
            let err = GatewayError::from(e);
            metrics::record_rpc_request(kind, err.kind(), start);
            err.into_response()
        }
    }
}

/// Count every request in the payload and log one line per call.
fn track_requests(
    state: &AppState,
    payload: &RpcPayload,
    client: &ClientAddr,
    request_id: &str,
) -> u64 {
    let mut tracked = 0;
    for request in payload.requests() {
        tracing::info!(
            request_id = %request_id,
            client = %client,
            method = %request.method,
            id = %request.id.unwrap_or(&serde_json::Value::Null),
            "JSON-RPC call"
        );
        state.registry.increment(request.method);
        tracked += 1;
    }
    tracked
}
