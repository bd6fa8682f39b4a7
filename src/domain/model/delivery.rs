//! Delivery Domain Model
//!
//! A delivery binds one courier to one order, with a deadline derived from
//! the courier's transport type.

use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub id: i64,
    pub courier_id: i64,
    pub order_id: String,
    pub status: DeliveryStatus,
    pub assigned_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Active,
    Completed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Active => "active",
            DeliveryStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(DeliveryStatus::Active),
            "completed" => Some(DeliveryStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a delivery. Inserted with status `active`; the store
/// assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDelivery {
    pub courier_id: i64,
    pub order_id: String,
    pub assigned_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}
