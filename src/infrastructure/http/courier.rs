//! Courier Admin Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::dto::{CourierResponse, CreateCourierRequest, UpdateCourierRequest};
use super::error::{bad_request, ApiError};
use super::{validate, HttpState};

pub async fn get(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return bad_request("Invalid courier ID");
    };

    match state.couriers.get_courier(id).await {
        Ok(courier) => (StatusCode::OK, Json(CourierResponse::from(courier))).into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}

pub async fn get_all(State(state): State<HttpState>) -> Response {
    match state.couriers.get_all_couriers().await {
        Ok(couriers) => {
            let response: Vec<CourierResponse> =
                couriers.into_iter().map(CourierResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => ApiError(err).into_response(),
    }
}

pub async fn create(
    State(state): State<HttpState>,
    payload: Result<Json<CreateCourierRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid JSON");
    };

    let new_courier = match validate::validate_create(req) {
        Ok(courier) => courier,
        Err(message) => return bad_request(message),
    };

    match state.couriers.create_courier(new_courier).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({ "id": id, "message": "Courier created successfully" })),
        )
            .into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}

pub async fn update(
    State(state): State<HttpState>,
    payload: Result<Json<UpdateCourierRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid JSON");
    };

    let patch = match validate::validate_update(req) {
        Ok(patch) => patch,
        Err(message) => return bad_request(message),
    };

    match state.couriers.update_courier(patch).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Courier updated successfully" })),
        )
            .into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}
