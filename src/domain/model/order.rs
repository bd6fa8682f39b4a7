//! Order Model
//!
//! Orders are owned by the external orders service; this service only
//! consumes them as messages and poll results.

use chrono::{DateTime, Utc};

/// Order row returned by the orders-service gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
    Cancelled,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(OrderStatus::Created),
            "cancelled" => Some(OrderStatus::Cancelled),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

/// Inbound order-status change consumed from the bus.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEvent {
    pub order_id: String,
    pub status: OrderStatus,
}
