//! Request Telemetry Middleware
//!
//! Logs every request and feeds the http metric families, labelled by the
//! matched route pattern rather than the raw path.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use crate::metrics;

pub async fn track(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unknown".to_owned());

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let elapsed = start.elapsed();

    info!(
        method = %method,
        path = %path,
        status = %status,
        duration_ms = elapsed.as_millis() as u64,
        "http request"
    );

    metrics::HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), &path, &status])
        .inc();
    metrics::HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method.as_str(), &path, &status])
        .observe(elapsed.as_secs_f64());

    response
}
