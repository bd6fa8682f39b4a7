//! Error Mapping
//!
//! Maps core sentinels to user-visible status codes. Anything else is an
//! internal error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::domain::model::DispatchError;

pub struct ApiError(pub DispatchError);

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        Self(err)
    }
}

pub fn map_error(err: &DispatchError) -> (StatusCode, &'static str) {
    match err {
        DispatchError::CourierNotFound => (StatusCode::NOT_FOUND, "Courier not found"),
        DispatchError::PhoneExists => (
            StatusCode::CONFLICT,
            "Courier with this phone already exists",
        ),
        DispatchError::DeliveryNotFound => (StatusCode::NOT_FOUND, "Delivery not found"),
        DispatchError::OrderAlreadyAssigned => (StatusCode::CONFLICT, "Order already assigned"),
        DispatchError::NoAvailableCouriers => (StatusCode::CONFLICT, "No available couriers"),
        DispatchError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = map_error(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_status_codes() {
        assert_eq!(
            map_error(&DispatchError::CourierNotFound).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(map_error(&DispatchError::PhoneExists).0, StatusCode::CONFLICT);
        assert_eq!(
            map_error(&DispatchError::DeliveryNotFound).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            map_error(&DispatchError::OrderAlreadyAssigned).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            map_error(&DispatchError::NoAvailableCouriers).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            map_error(&DispatchError::Storage("boom".to_owned())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
