pub mod order_status_consumer;

pub use order_status_consumer::{OrderConsumerConfig, OrderStatusConsumer};
