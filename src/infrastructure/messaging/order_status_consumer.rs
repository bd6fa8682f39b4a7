//! Kafka Order-Status Consumer
//!
//! Consumes order-status change events and forwards them to the
//! order-changed usecase. Offsets auto-commit on a fixed interval, so
//! delivery is at-most-once: a message is consumed whether or not the
//! downstream call succeeded.

use std::sync::Arc;

use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::ClientConfig;
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::domain::model::{OrderEvent, OrderStatus};
use crate::usecases::order_changed::OrderChangedUsecase;

/// Kafka topic for order status changes
pub const TOPIC_ORDER_STATUS_CHANGED: &str = "order.status.changed";

/// Consumer group ID
pub const CONSUMER_GROUP: &str = "my-group-id";

/// Order status change event payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusMessage {
    pub order_id: String,
    pub status: String,
}

/// Configuration for the order-status consumer
#[derive(Debug, Clone)]
pub struct OrderConsumerConfig {
    /// Kafka bootstrap servers
    pub brokers: String,
    /// Consumer group ID
    pub group_id: String,
    /// Topic to consume from
    pub topic: String,
}

impl Default for OrderConsumerConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_owned(),
            group_id: CONSUMER_GROUP.to_owned(),
            topic: TOPIC_ORDER_STATUS_CHANGED.to_owned(),
        }
    }
}

impl OrderConsumerConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            brokers: std::env::var("KAFKA_BROKER").unwrap_or_else(|_| "localhost:9092".to_owned()),
            group_id: std::env::var("KAFKA_GROUP_ID").unwrap_or_else(|_| CONSUMER_GROUP.to_owned()),
            topic: std::env::var("KAFKA_ORDER_TOPIC")
                .unwrap_or_else(|_| TOPIC_ORDER_STATUS_CHANGED.to_owned()),
        }
    }
}

pub struct OrderStatusConsumer {
    consumer: StreamConsumer,
    usecase: Arc<OrderChangedUsecase>,
    config: OrderConsumerConfig,
    shutdown_rx: broadcast::Receiver<()>,
}

impl OrderStatusConsumer {
    pub fn new(
        config: OrderConsumerConfig,
        usecase: Arc<OrderChangedUsecase>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<Self, String> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "1000")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "30000")
            .create()
            .map_err(|e| format!("Failed to create Kafka consumer: {e}"))?;

        consumer
            .subscribe(&[&config.topic])
            .map_err(|e| format!("Failed to subscribe to topic {}: {e}", config.topic))?;

        info!("Order status consumer subscribed to topic: {}", config.topic);

        Ok(Self {
            consumer,
            usecase,
            config,
            shutdown_rx,
        })
    }

    /// Run the consumer loop
    pub async fn run(mut self) {
        info!(
            "Starting order status consumer for topic: {}",
            self.config.topic
        );

        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    info!("Order status consumer received shutdown signal");
                    break;
                }
                message = self.consumer.recv() => {
                    match message {
                        Ok(msg) => {
                            if let Some(payload) = msg.payload() {
                                self.process_message(payload).await;
                            }
                        }
                        Err(e) => {
                            error!("Error receiving message from Kafka: {e}");
                        }
                    }
                }
            }
        }

        info!("Order status consumer stopped");
    }

    /// Process a single message; the offset advances via auto-commit in
    /// every branch.
    async fn process_message(&self, payload: &[u8]) {
        let msg: OrderStatusMessage = match serde_json::from_slice(payload) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Received malformed order status message: {e}");
                return;
            }
        };

        let Some(status) = OrderStatus::parse(&msg.status) else {
            info!(status = %msg.status, "Skipping message with unhandled status");
            return;
        };

        let event = OrderEvent {
            order_id: msg.order_id,
            status,
        };

        if let Err(e) = self.usecase.process(event.clone()).await {
            error!(order_id = %event.order_id, error = %e, "Failed to process order status change");
        }
    }
}
