//! HTTP Façade
//!
//! Thin JSON surface over the courier admin service and the dispatch core,
//! with rate limiting and request telemetry applied as middleware.

pub mod common;
pub mod courier;
pub mod delivery;
pub mod dto;
pub mod error;
pub mod rate_limit;
pub mod telemetry;
pub mod validate;

use std::sync::Arc;

use axum::routing::{get, head, post};
use axum::{middleware, Router};

use crate::usecases::courier_admin::CourierAdminOps;
use crate::usecases::dispatch::DispatchOps;

use rate_limit::TokenBucket;

#[derive(Clone)]
pub struct HttpState {
    pub couriers: Arc<dyn CourierAdminOps>,
    pub dispatch: Arc<dyn DispatchOps>,
}

pub fn router(state: HttpState, rate_limiter: Arc<TokenBucket>) -> Router {
    let api = Router::new()
        .route("/couriers", get(courier::get_all))
        .route("/courier/{id}", get(courier::get))
        .route("/courier", post(courier::create).put(courier::update))
        .route("/delivery/assign", post(delivery::assign))
        .route("/delivery/unassign", post(delivery::unassign))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit::rate_limit,
        ))
        .with_state(state);

    Router::new()
        .route("/ping", get(common::ping))
        .route("/healthcheck", head(common::healthcheck))
        .route("/metrics", get(common::metrics_text))
        .merge(api)
        .layer(middleware::from_fn(telemetry::track))
}
