//! Delivery Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::dto::{AssignRequest, AssignResponse, UnassignRequest, UnassignResponse};
use super::error::{bad_request, ApiError};
use super::HttpState;

pub async fn assign(
    State(state): State<HttpState>,
    payload: Result<Json<AssignRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid JSON");
    };
    if req.order_id.is_empty() {
        return bad_request("Invalid JSON");
    }

    match state.dispatch.assign_courier(&req.order_id).await {
        Ok(result) => (StatusCode::OK, Json(AssignResponse::from(result))).into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}

pub async fn unassign(
    State(state): State<HttpState>,
    payload: Result<Json<UnassignRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid JSON");
    };
    if req.order_id.is_empty() {
        return bad_request("Invalid JSON");
    }

    match state.dispatch.unassign_courier(&req.order_id).await {
        Ok(result) => (StatusCode::OK, Json(UnassignResponse::from(result))).into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}
