//! Token-Bucket Rate Limiter
//!
//! Mutex-guarded counter refilled by wall time, applied as middleware over
//! the API routes.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use tracing::warn;

use crate::metrics;

pub struct TokenBucket {
    capacity: u32,
    refill_rate: u32,
    inner: Mutex<Inner>,
}

struct Inner {
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    /// Bucket holding `capacity` tokens, refilled by `refill_rate` tokens
    /// per second.
    pub fn new(capacity: u32, refill_rate: u32) -> Self {
        Self {
            capacity,
            refill_rate,
            inner: Mutex::new(Inner {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn allow(&self) -> bool {
        let mut inner = self.inner.lock();

        // Refill by whole elapsed seconds only, so the refill instant does
        // not drift on sub-second checks.
        let elapsed_secs = inner.last_refill.elapsed().as_secs();
        let tokens_to_add = elapsed_secs.saturating_mul(self.refill_rate as u64);
        if tokens_to_add > 0 {
            inner.tokens = (inner.tokens as u64 + tokens_to_add).min(self.capacity as u64) as u32;
            inner.last_refill = Instant::now();
        }

        if inner.tokens > 0 {
            inner.tokens -= 1;
            true
        } else {
            false
        }
    }
}

pub async fn rate_limit(
    State(bucket): State<Arc<TokenBucket>>,
    request: Request,
    next: Next,
) -> Response {
    if !bucket.allow() {
        warn!(path = %request.uri().path(), "Rate limit exceeded");
        metrics::RATE_LIMIT_EXCEEDED_TOTAL.inc();
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [
                ("X-RateLimit-Limit", bucket.capacity().to_string()),
                ("X-RateLimit-Remaining", "0".to_owned()),
            ],
            "Rate limit exceeded",
        )
            .into_response();
    }

    next.run(request).await
}
