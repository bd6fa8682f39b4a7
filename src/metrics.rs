//! Process-wide Prometheus Metrics
//!
//! Counters and histograms registered against the default registry and
//! exposed on `GET /metrics`.

use std::sync::LazyLock;

use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec, TextEncoder,
};

/// Successful dispatch operations (assign, unassign).
pub static OPS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!("operations_total", "Total number of dispatch operations")
        .expect("register operations_total")
});

pub static RATE_LIMIT_EXCEEDED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!(
        "rate_limit_exceeded_total",
        "Number of requests rejected by the rate limiter"
    )
    .expect("register rate_limit_exceeded_total")
});

pub static GATEWAY_RETRIES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!(
        "gateway_retries_total",
        "Number of retries performed by the order gateway"
    )
    .expect("register gateway_retries_total")
});

pub static HTTP_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "http_requests_total",
        "Number of HTTP requests",
        &["method", "path", "status_code"]
    )
    .expect("register http_requests_total")
});

pub static HTTP_REQUEST_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path", "status_code"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("register http_request_duration_seconds")
});

/// Renders the default registry in the Prometheus text format.
pub fn render() -> Result<String, prometheus::Error> {
    TextEncoder::new().encode_to_string(&prometheus::gather())
}
