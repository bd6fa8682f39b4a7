//! Retry Executor
//!
//! Generic bounded-attempt retry with a pluggable backoff strategy and a
//! retryable-error predicate. Sleeps run on the tokio timer, so dropping the
//! returned future cancels an in-flight wait.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum RetryError<E>
where
    E: std::fmt::Debug + std::fmt::Display,
{
    /// Every attempt failed with a retryable error; carries the last one.
    #[error("max retry attempts exceeded: {0}")]
    MaxAttemptsExceeded(E),

    /// The operation failed with a non-retryable error; returned unchanged.
    #[error("{0}")]
    Permanent(E),
}

/// Yields the delay to wait before the next attempt.
pub trait Strategy: Send + Sync {
    fn next_delay(&self, attempt: u32) -> Duration;
}

pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration, multiplier: f64) -> Self {
        Self {
            initial,
            max,
            multiplier,
        }
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_secs(1), 2.0)
    }
}

impl Strategy for ExponentialBackoff {
    fn next_delay(&self, attempt: u32) -> Duration {
        let delay =
            self.initial.as_secs_f64() * self.multiplier.powi(attempt.saturating_sub(1) as i32);
        Duration::from_secs_f64(delay.min(self.max.as_secs_f64()))
    }
}

type Predicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;
type OnRetry<E> = Box<dyn Fn(u32, &E, Duration) + Send + Sync>;

pub struct RetryExecutor<E> {
    max_attempts: u32,
    strategy: Box<dyn Strategy>,
    should_retry: Predicate<E>,
    on_retry: Option<OnRetry<E>>,
}

impl<E> RetryExecutor<E>
where
    E: std::fmt::Debug + std::fmt::Display,
{
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            strategy: Box::new(ExponentialBackoff::default()),
            should_retry: Box::new(|_| true),
            on_retry: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        if max_attempts > 0 {
            self.max_attempts = max_attempts;
        }
        self
    }

    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn with_should_retry(
        mut self,
        should_retry: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.should_retry = Box::new(should_retry);
        self
    }

    /// Callback fired on every retry decision, before the backoff sleep.
    pub fn with_on_retry(
        mut self,
        on_retry: impl Fn(u32, &E, Duration) + Send + Sync + 'static,
    ) -> Self {
        self.on_retry = Some(Box::new(on_retry));
        self
    }

    pub async fn execute<T, F, Fut>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !(self.should_retry)(&err) {
                        return Err(RetryError::Permanent(err));
                    }
                    if attempt == self.max_attempts {
                        return Err(RetryError::MaxAttemptsExceeded(err));
                    }

                    let delay = self.strategy.next_delay(attempt);
                    if let Some(on_retry) = &self.on_retry {
                        on_retry(attempt, &err, delay);
                    }
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl<E> Default for RetryExecutor<E>
where
    E: std::fmt::Debug + std::fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum StubError {
        #[error("temporary")]
        Temporary,
        #[error("permanent")]
        Permanent,
    }

    fn fast_executor() -> RetryExecutor<StubError> {
        RetryExecutor::new()
            .with_strategy(ExponentialBackoff::new(
                Duration::from_millis(1),
                Duration::from_millis(2),
                2.0,
            ))
            .with_should_retry(|e| matches!(e, StubError::Temporary))
    }

    #[tokio::test]
    async fn test_succeeds_after_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let counted = calls.clone();

        let result = fast_executor()
            .execute(|| {
                let calls = counted.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(StubError::Temporary)
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_returns_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counted = calls.clone();

        let result: Result<(), _> = fast_executor()
            .execute(|| {
                let calls = counted.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(StubError::Permanent)
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Permanent(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_wraps_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counted = calls.clone();
        let retries = Arc::new(AtomicU32::new(0));
        let observed = retries.clone();

        let result: Result<(), _> = fast_executor()
            .with_on_retry(move |_, _, _| {
                observed.fetch_add(1, Ordering::SeqCst);
            })
            .execute(|| {
                let calls = counted.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(StubError::Temporary)
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::MaxAttemptsExceeded(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(retries.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_exponential_backoff_caps_at_max() {
        let backoff =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(1), 2.0);
        assert_eq!(backoff.next_delay(1), Duration::from_millis(100));
        assert_eq!(backoff.next_delay(2), Duration::from_millis(200));
        assert_eq!(backoff.next_delay(3), Duration::from_millis(400));
        assert_eq!(backoff.next_delay(10), Duration::from_secs(1));
    }
}
