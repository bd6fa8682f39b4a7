//! HTTP DTOs

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::domain::model::Courier;
use crate::usecases::dispatch::{AssignResult, UnassignResult};

#[derive(Debug, Serialize)]
pub struct CourierResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub status: String,
    pub transport_type: String,
}

impl From<Courier> for CourierResponse {
    fn from(courier: Courier) -> Self {
        Self {
            id: courier.id,
            name: courier.name,
            phone: courier.phone,
            status: courier.status.as_str().to_owned(),
            transport_type: courier.transport_type.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCourierRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub transport_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourierRequest {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transport_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    #[serde(default)]
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UnassignRequest {
    #[serde(default)]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct AssignResponse {
    pub courier_id: i64,
    pub order_id: String,
    pub transport_type: String,
    pub delivery_deadline: String,
}

impl From<AssignResult> for AssignResponse {
    fn from(result: AssignResult) -> Self {
        Self {
            courier_id: result.courier_id,
            order_id: result.order_id,
            transport_type: result.transport_type.as_str().to_owned(),
            delivery_deadline: result
                .deadline
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnassignResponse {
    pub order_id: String,
    pub status: String,
    pub courier_id: i64,
}

impl From<UnassignResult> for UnassignResponse {
    fn from(result: UnassignResult) -> Self {
        Self {
            order_id: result.order_id,
            status: result.status.to_owned(),
            courier_id: result.courier_id,
        }
    }
}
