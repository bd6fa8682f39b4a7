//! Order-Poll Worker
//!
//! Periodically pulls recently created orders from the orders service and
//! assigns couriers to them. The cursor is a short lookback window off the
//! clock and is not persisted; deduplication relies on the dispatch service
//! rejecting already-assigned orders.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::domain::clock::Clock;
use crate::infrastructure::rpc::{OrderGateway, OrdersApi};
use crate::usecases::dispatch::DispatchOps;

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Overlap between consecutive polls.
const LOOKBACK_SECONDS: i64 = 5;

pub struct OrderPollWorker<A: OrdersApi> {
    service: Arc<dyn DispatchOps>,
    gateway: Arc<OrderGateway<A>>,
    clock: Arc<dyn Clock>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl<A: OrdersApi> OrderPollWorker<A> {
    pub fn new(
        service: Arc<dyn DispatchOps>,
        gateway: Arc<OrderGateway<A>>,
        clock: Arc<dyn Clock>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            service,
            gateway,
            clock,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        info!(
            interval_secs = POLL_INTERVAL.as_secs(),
            "Starting order polling worker"
        );

        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!("Stopping order polling worker");
                    return;
                }
                _ = ticker.tick() => {
                    self.process().await;
                }
            }
        }
    }

    async fn process(&self) {
        let cursor = self.clock.now() - chrono::Duration::seconds(LOOKBACK_SECONDS);

        let orders = match self.gateway.get_orders(cursor).await {
            Ok(orders) => orders,
            Err(e) => {
                error!(error = %e, "Failed to fetch orders");
                return;
            }
        };

        if orders.is_empty() {
            info!("No new orders");
            return;
        }

        let mut latest = cursor;
        for order in &orders {
            match self.service.assign_courier(&order.id).await {
                Ok(_) => info!(order_id = %order.id, "Assigned courier for order"),
                Err(e) => {
                    error!(order_id = %order.id, error = %e, "Failed to assign courier for order")
                }
            }

            if order.created_at > latest {
                latest = order.created_at;
            }
        }

        info!(
            count = orders.len(),
            cursor = %latest.to_rfc3339(),
            "Processed orders"
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tonic::Status;

    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::model::{DispatchError, TransportType};
    use crate::infrastructure::rpc::order_gateway::MockOrdersApi;
    use crate::infrastructure::rpc::proto::order::v1;
    use crate::usecases::dispatch::{AssignResult, MockDispatchOps};

    fn proto_order(id: &str, seconds: i64) -> v1::Order {
        v1::Order {
            id: id.to_owned(),
            created_at: Some(prost_types::Timestamp { seconds, nanos: 0 }),
        }
    }

    fn worker(
        api: MockOrdersApi,
        dispatch: MockDispatchOps,
    ) -> OrderPollWorker<MockOrdersApi> {
        let (_tx, shutdown_rx) = broadcast::channel(1);
        OrderPollWorker::new(
            Arc::new(dispatch),
            Arc::new(OrderGateway::new(api)),
            Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            )),
            shutdown_rx,
        )
    }

    #[tokio::test]
    async fn test_process_assigns_each_fetched_order() {
        let mut api = MockOrdersApi::new();
        api.expect_get_orders().times(1).returning(|request| {
            // cursor = fixed clock minus the lookback window
            assert_eq!(
                request.from.unwrap().seconds,
                Utc.with_ymd_and_hms(2024, 1, 1, 11, 59, 55)
                    .unwrap()
                    .timestamp()
            );
            Ok(v1::GetOrdersResponse {
                orders: vec![
                    proto_order("order-1", 1_704_110_400),
                    proto_order("order-2", 1_704_110_401),
                ],
            })
        });

        let mut dispatch = MockDispatchOps::new();
        dispatch
            .expect_assign_courier()
            .withf(|order_id| order_id == "order-1")
            .times(1)
            .returning(|order_id| {
                Ok(AssignResult {
                    courier_id: 1,
                    order_id: order_id.to_owned(),
                    transport_type: TransportType::Car,
                    deadline: Utc::now(),
                })
            });
        dispatch
            .expect_assign_courier()
            .withf(|order_id| order_id == "order-2")
            .times(1)
            .returning(|_| Err(DispatchError::OrderAlreadyAssigned));

        worker(api, dispatch).process().await;
    }

    #[tokio::test]
    async fn test_process_skips_assignment_when_fetch_fails() {
        let mut api = MockOrdersApi::new();
        api.expect_get_orders()
            .times(1)
            .returning(|_| Err(Status::invalid_argument("bad request")));

        let dispatch = MockDispatchOps::new();

        worker(api, dispatch).process().await;
    }
}
