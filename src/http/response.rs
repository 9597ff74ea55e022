//! Response builders.
//!
//! Everything the gateway writes is `application/json`: upstream bodies are
//! passed through verbatim, errors use the JSON-RPC error shape.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{"jsonrpc":"2.0","error":{"message":..,"data":..}}`
#[derive(Debug, Serialize)]
pub struct RpcErrorBody<'a> {
    pub jsonrpc: &'static str,
    pub error: RpcErrorDetail<'a>,
}

#[derive(Debug, Serialize)]
pub struct RpcErrorDetail<'a> {
    pub message: &'a str,
    pub data: &'a str,
}

/// Raw JSON body with the given status.
pub fn json_bytes(status: StatusCode, body: impl Into<Bytes>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        Body::from(body.into()),
    )
        .into_response()
}

/// JSON-RPC-shaped error response.
pub fn rpc_error(status: StatusCode, message: &str, data: &str) -> Response {
    let body = RpcErrorBody {
        jsonrpc: "2.0",
        error: RpcErrorDetail { message, data },
    };
    match serde_json::to_vec(&body) {
        Ok(bytes) => json_bytes(status, bytes),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize error body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Upstream body relayed to the client with 200.
pub fn passthrough(body: Bytes) -> Response {
    json_bytes(StatusCode::OK, body)
}
