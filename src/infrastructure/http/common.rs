//! Common Handlers

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::metrics;

pub async fn ping() -> Response {
    (StatusCode::OK, Json(json!({ "message": "pong" }))).into_response()
}

pub async fn healthcheck() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn metrics_text() -> Response {
    match metrics::render() {
        Ok(text) => (StatusCode::OK, text).into_response(),
        Err(e) => {
            error!(error = %e, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
