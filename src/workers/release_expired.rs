//! Expiration Worker
//!
//! Periodic driver for `release_expired_couriers`: one run at startup, then
//! one per tick. Errors are logged and never stop the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::usecases::dispatch::DispatchOps;

pub const DEFAULT_RELEASE_INTERVAL: Duration = Duration::from_secs(10);

/// Resolves the release interval from the `RELEASE_INTERVAL_SECONDS`
/// environment value. Unparseable or non-positive values fall back to the
/// default.
pub fn parse_release_interval(value: Option<&str>) -> Duration {
    match value.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(secs) if secs > 0 => Duration::from_secs(secs as u64),
        _ => DEFAULT_RELEASE_INTERVAL,
    }
}

pub struct ReleaseExpiredWorker {
    service: Arc<dyn DispatchOps>,
    interval: Duration,
    shutdown_rx: broadcast::Receiver<()>,
}

impl ReleaseExpiredWorker {
    pub fn new(
        service: Arc<dyn DispatchOps>,
        interval: Duration,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            service,
            interval,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting courier release worker"
        );

        self.release().await;

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a tokio interval completes immediately; the
        // startup run above already covered it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!("Stopping courier release worker");
                    return;
                }
                _ = ticker.tick() => {
                    self.release().await;
                }
            }
        }
    }

    async fn release(&self) {
        if let Err(e) = self.service.release_expired_couriers().await {
            error!(error = %e, "Failed to release expired couriers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::dispatch::MockDispatchOps;

    #[test]
    fn test_parse_release_interval() {
        assert_eq!(parse_release_interval(Some("30")), Duration::from_secs(30));
        assert_eq!(parse_release_interval(None), DEFAULT_RELEASE_INTERVAL);
        assert_eq!(parse_release_interval(Some("0")), DEFAULT_RELEASE_INTERVAL);
        assert_eq!(parse_release_interval(Some("-5")), DEFAULT_RELEASE_INTERVAL);
        assert_eq!(
            parse_release_interval(Some("ten")),
            DEFAULT_RELEASE_INTERVAL
        );
    }

    #[tokio::test]
    async fn test_run_releases_on_startup_and_stops_on_shutdown() {
        let mut dispatch = MockDispatchOps::new();
        dispatch
            .expect_release_expired_couriers()
            .times(1..)
            .returning(|| Ok(()));

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let worker = ReleaseExpiredWorker::new(
            Arc::new(dispatch),
            Duration::from_secs(60),
            shutdown_rx,
        );

        let handle = tokio::spawn(worker.run());
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown_tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker should stop on shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_keeps_ticking_after_errors() {
        let mut dispatch = MockDispatchOps::new();
        dispatch
            .expect_release_expired_couriers()
            .times(2..)
            .returning(|| Err(crate::domain::model::DispatchError::Storage(
                "connection reset".to_owned(),
            )));

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let worker = ReleaseExpiredWorker::new(
            Arc::new(dispatch),
            Duration::from_millis(5),
            shutdown_rx,
        );

        let handle = tokio::spawn(worker.run());
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker should stop on shutdown")
            .unwrap();
    }
}
