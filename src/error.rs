//! Request-scoped errors and their client-visible rendering.
//!
//! Every variant is recovered at the request boundary: it becomes a
//! JSON-RPC-shaped error body with HTTP 400 and never affects other
//! in-flight requests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::response::rpc_error;
use crate::upstream::ForwardError;

/// Errors raised while handling a single `/rpc` request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Body is not valid JSON.
    #[error("could not parse JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// Body is valid JSON but neither an object nor an array.
    #[error("invalid JSON received: expected object or array")]
    NotObjectOrArray,

    /// A request object has no non-empty `method` string.
    #[error("missing method field")]
    MissingMethod,

    /// Network-level failure talking to the upstream node.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[from] ForwardError),
}

impl GatewayError {
    /// The `error.message` field sent to the client.
    pub fn message(&self) -> &'static str {
        match self {
            GatewayError::Parse(_) | GatewayError::NotObjectOrArray => "Parse error",
            GatewayError::MissingMethod => "Invalid request",
            GatewayError::UpstreamUnreachable(_) => "Proxy error",
        }
    }

    /// The `error.data` field sent to the client.
    pub fn data(&self) -> &'static str {
        match self {
            GatewayError::Parse(_) => "Could not parse JSON.",
            GatewayError::NotObjectOrArray => "Invalid JSON received.",
            GatewayError::MissingMethod => "Missing method field.",
            GatewayError::UpstreamUnreachable(_) => "Could not connect to Ethereum node.",
        }
    }

    /// Short label used for logs and Prometheus outcomes.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Parse(_) | GatewayError::NotObjectOrArray => "parse_error",
            GatewayError::MissingMethod => "invalid_request",
            GatewayError::UpstreamUnreachable(_) => "upstream_unreachable",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        rpc_error(StatusCode::BAD_REQUEST, self.message(), self.data())
    }
}
