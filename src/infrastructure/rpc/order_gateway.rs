//! Order Gateway
//!
//! Outbound client of the orders service. Wraps the raw gRPC call with
//! bounded retries on transient status codes and converts proto rows into
//! domain orders.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Request, Status};
use tracing::warn;

use crate::domain::model::Order;
use crate::infrastructure::retry::{RetryError, RetryExecutor};
use crate::metrics;

use super::proto::order::v1::orders_service_client::OrdersServiceClient;
use super::proto::order::v1::{GetOrdersRequest, GetOrdersResponse};

/// Transient transport failures worth another attempt.
const RETRYABLE_CODES: [Code; 3] = [
    Code::Unavailable,
    Code::DeadlineExceeded,
    Code::ResourceExhausted,
];

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("max retry attempts exceeded: {0}")]
    MaxAttemptsExceeded(Status),

    #[error("get orders failed: {0}")]
    Rpc(Status),

    #[error("failed to connect to orders service: {0}")]
    Connect(#[from] tonic::transport::Error),
}

impl From<RetryError<Status>> for GatewayError {
    fn from(err: RetryError<Status>) -> Self {
        match err {
            RetryError::MaxAttemptsExceeded(status) => GatewayError::MaxAttemptsExceeded(status),
            RetryError::Permanent(status) => GatewayError::Rpc(status),
        }
    }
}

/// Configuration for the orders-service connection
#[derive(Debug, Clone)]
pub struct OrderGatewayConfig {
    /// Orders service address, including scheme
    pub addr: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OrderGatewayConfig {
    fn default() -> Self {
        Self {
            addr: "http://service-order:50051".to_owned(),
            timeout: Duration::from_secs(3),
        }
    }
}

impl OrderGatewayConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut addr = std::env::var("ORDER_SERVICE_GRPC_ADDR")
            .unwrap_or_else(|_| "service-order:50051".to_owned());
        if !addr.starts_with("http://") && !addr.starts_with("https://") {
            addr = format!("http://{addr}");
        }

        Self {
            addr,
            ..Self::default()
        }
    }
}

/// Raw call surface of the orders service, kept narrow so tests can stub it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    async fn get_orders(&self, request: GetOrdersRequest) -> Result<GetOrdersResponse, Status>;
}

/// Tonic-backed implementation of [`OrdersApi`].
pub struct GrpcOrdersApi {
    client: OrdersServiceClient<Channel>,
}

impl GrpcOrdersApi {
    /// Builds a lazily-connecting client; the first RPC establishes the
    /// channel.
    pub fn connect(config: &OrderGatewayConfig) -> Result<Self, GatewayError> {
        let channel = Endpoint::from_shared(config.addr.clone())?
            .timeout(config.timeout)
            .connect_lazy();

        Ok(Self {
            client: OrdersServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl OrdersApi for GrpcOrdersApi {
    async fn get_orders(&self, request: GetOrdersRequest) -> Result<GetOrdersResponse, Status> {
        let mut client = self.client.clone();
        let response = client.get_orders(Request::new(request)).await?;
        Ok(response.into_inner())
    }
}

pub struct OrderGateway<A: OrdersApi> {
    api: A,
    retry: RetryExecutor<Status>,
}

impl<A: OrdersApi> OrderGateway<A> {
    pub fn new(api: A) -> Self {
        let retry = RetryExecutor::new()
            .with_should_retry(|status: &Status| RETRYABLE_CODES.contains(&status.code()))
            .with_on_retry(|attempt, status: &Status, delay| {
                metrics::GATEWAY_RETRIES_TOTAL.inc();
                warn!(
                    attempt,
                    code = ?status.code(),
                    delay_ms = delay.as_millis() as u64,
                    "retrying orders fetch"
                );
            });

        Self { api, retry }
    }

    /// Orders created at or after `from`.
    pub async fn get_orders(&self, from: DateTime<Utc>) -> Result<Vec<Order>, GatewayError> {
        let request = GetOrdersRequest {
            from: Some(to_timestamp(from)),
        };

        let response = self
            .retry
            .execute(|| {
                let request = request.clone();
                async move { self.api.get_orders(request).await }
            })
            .await?;

        Ok(response
            .orders
            .into_iter()
            .map(|order| Order {
                id: order.id,
                created_at: order
                    .created_at
                    .map(from_timestamp)
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            })
            .collect())
    }
}

fn to_timestamp(at: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: at.timestamp(),
        nanos: at.timestamp_subsec_nanos() as i32,
    }
}

fn from_timestamp(ts: Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.seconds, ts.nanos.max(0) as u32)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::super::proto::order::v1;
    use super::*;

    fn response_with_one_order(created_at: DateTime<Utc>) -> GetOrdersResponse {
        GetOrdersResponse {
            orders: vec![v1::Order {
                id: "order-1".to_owned(),
                created_at: Some(to_timestamp(created_at)),
            }],
        }
    }

    #[tokio::test]
    async fn test_retries_on_unavailable_then_succeeds() {
        let now = Utc::now();
        let calls = Arc::new(AtomicU32::new(0));
        let counted = calls.clone();

        let mut api = MockOrdersApi::new();
        api.expect_get_orders().returning(move |_| {
            if counted.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Status::unavailable("temporary"))
            } else {
                Ok(response_with_one_order(now))
            }
        });

        let before = metrics::GATEWAY_RETRIES_TOTAL.get();
        let orders = OrderGateway::new(api).get_orders(now).await.unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, "order-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(metrics::GATEWAY_RETRIES_TOTAL.get(), before + 1);
    }

    #[tokio::test]
    async fn test_does_not_retry_on_invalid_argument() {
        let calls = Arc::new(AtomicU32::new(0));
        let counted = calls.clone();

        let mut api = MockOrdersApi::new();
        api.expect_get_orders().returning(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
            Err(Status::invalid_argument("bad request"))
        });

        let err = OrderGateway::new(api)
            .get_orders(Utc::now())
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Rpc(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let at = DateTime::from_timestamp(1_704_110_400, 0).unwrap();
        assert_eq!(from_timestamp(to_timestamp(at)), at);
    }
}
