//! Dependency Injection Module
//!
//! Provides application state and dependency wiring.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::clock::{Clock, SystemClock};
use crate::infrastructure::http::rate_limit::TokenBucket;
use crate::infrastructure::messaging::{OrderConsumerConfig, OrderStatusConsumer};
use crate::infrastructure::repository::{
    CourierPostgresStore, DeliveryPostgresStore, PostgresTxCoordinator,
};
use crate::infrastructure::rpc::{GrpcOrdersApi, OrderGateway, OrderGatewayConfig};
use crate::usecases::courier_admin::CourierAdminService;
use crate::usecases::dispatch::DispatchService;
use crate::usecases::order_changed::OrderChangedUsecase;
use crate::workers::{OrderPollWorker, ReleaseExpiredWorker};

const DB_CONNECT_ATTEMPTS: u32 = 5;
const DB_CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

const RATE_LIMIT_CAPACITY: u32 = 10;
const RATE_LIMIT_REFILL_PER_SECOND: u32 = 10;

/// DI initialization errors
#[derive(Debug, Error)]
pub enum DiError {
    #[error("Database connection failed: {0}")]
    DatabaseError(String),

    #[error("Kafka connection failed: {0}")]
    KafkaError(String),

    #[error("Order gateway initialization failed: {0}")]
    GatewayError(String),
}

/// Application state containing all dependencies
pub struct AppState {
    /// Database connection (for migrations and shutdown)
    pub db: DatabaseConnection,

    /// Courier admin service backing the HTTP CRUD surface
    pub courier_admin: Arc<CourierAdminService>,

    /// The dispatch core
    pub dispatch: Arc<DispatchService>,

    /// Orders-service gateway used by the poll worker
    pub order_gateway: Arc<OrderGateway<GrpcOrdersApi>>,

    /// Order-changed usecase consumed by the bus handler
    pub order_changed: Arc<OrderChangedUsecase>,

    /// Token bucket applied over the API routes
    pub rate_limiter: Arc<TokenBucket>,

    /// Shared time source
    pub clock: Arc<dyn Clock>,

    /// Shutdown signal sender
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Create a new AppState with all dependencies initialized
    pub async fn new(config: &Config) -> Result<Self, DiError> {
        info!("Initializing application state...");

        info!("Connecting to PostgreSQL...");
        let db = connect_db(&config.postgres.url()).await?;
        info!("PostgreSQL connected");

        let couriers = Arc::new(CourierPostgresStore::new());
        let deliveries = Arc::new(DeliveryPostgresStore::new());
        let tx = Arc::new(PostgresTxCoordinator::new(db.clone()));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let dispatch = Arc::new(DispatchService::new(
            deliveries,
            couriers.clone(),
            tx.clone(),
            clock.clone(),
        ));
        let courier_admin = Arc::new(CourierAdminService::new(couriers, tx));
        let order_changed = Arc::new(OrderChangedUsecase::new(dispatch.clone()));

        let gateway_config = OrderGatewayConfig::from_env();
        info!(addr = %gateway_config.addr, "Connecting to orders service...");
        let orders_api = GrpcOrdersApi::connect(&gateway_config)
            .map_err(|e| DiError::GatewayError(e.to_string()))?;
        let order_gateway = Arc::new(OrderGateway::new(orders_api));

        let rate_limiter = Arc::new(TokenBucket::new(
            RATE_LIMIT_CAPACITY,
            RATE_LIMIT_REFILL_PER_SECOND,
        ));

        let (shutdown_tx, _) = broadcast::channel(1);

        info!("Application state initialized");

        Ok(Self {
            db,
            courier_admin,
            dispatch,
            order_gateway,
            order_changed,
            rate_limiter,
            clock,
            shutdown_tx,
        })
    }

    /// Start the order-status bus consumer as a background task
    pub async fn start_consumer(&self) -> Result<(), DiError> {
        info!("Starting order status consumer...");

        let consumer = OrderStatusConsumer::new(
            OrderConsumerConfig::from_env(),
            self.order_changed.clone(),
            self.shutdown_tx.subscribe(),
        )
        .map_err(DiError::KafkaError)?;

        tokio::spawn(consumer.run());

        info!("Order status consumer started");

        Ok(())
    }

    /// Start the expiration and order-poll workers
    pub fn start_workers(&self, config: &Config) -> Vec<JoinHandle<()>> {
        let release_worker = ReleaseExpiredWorker::new(
            self.dispatch.clone(),
            config.release_interval,
            self.shutdown_tx.subscribe(),
        );
        let poll_worker = OrderPollWorker::new(
            self.dispatch.clone(),
            self.order_gateway.clone(),
            self.clock.clone(),
            self.shutdown_tx.subscribe(),
        );

        vec![
            tokio::spawn(release_worker.run()),
            tokio::spawn(poll_worker.run()),
        ]
    }

    /// Shutdown the application
    pub fn shutdown(&self) {
        info!("Sending shutdown signal...");
        let _ = self.shutdown_tx.send(());
    }
}

async fn connect_db(url: &str) -> Result<DatabaseConnection, DiError> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(10)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(5));

    let mut last_err = String::new();
    for attempt in 1..=DB_CONNECT_ATTEMPTS {
        match Database::connect(options.clone()).await {
            Ok(db) => return Ok(db),
            Err(e) => {
                warn!(attempt, error = %e, "Database connect attempt failed");
                last_err = e.to_string();
                if attempt < DB_CONNECT_ATTEMPTS {
                    tokio::time::sleep(DB_CONNECT_RETRY_DELAY).await;
                }
            }
        }
    }

    Err(DiError::DatabaseError(last_err))
}
