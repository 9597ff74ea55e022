//! `GET /metrics` handler: per-method call counts as a flat JSON object.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http::response::json_bytes;
use crate::http::server::AppState;

pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.registry.snapshot();
    match serde_json::to_vec_pretty(&snapshot) {
        Ok(body) => json_bytes(StatusCode::OK, body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize metrics snapshot");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
