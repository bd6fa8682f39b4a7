//! Courier Domain Model
//!
//! A courier is a person with a transport type and a status who can be
//! assigned to deliveries. Stores accept and return these value records.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::model::transport::TransportType;

#[derive(Debug, Clone, PartialEq)]
pub struct Courier {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub status: CourierStatus,
    pub transport_type: TransportType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourierStatus {
    Available,
    Busy,
    Paused,
}

impl CourierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourierStatus::Available => "available",
            CourierStatus::Busy => "busy",
            CourierStatus::Paused => "paused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(CourierStatus::Available),
            "busy" => Some(CourierStatus::Busy),
            "paused" => Some(CourierStatus::Paused),
            _ => None,
        }
    }
}

impl fmt::Display for CourierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a courier. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourier {
    pub name: String,
    pub phone: String,
    pub status: CourierStatus,
    pub transport_type: TransportType,
}

/// Partial courier update. `None` fields are preserved as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CourierPatch {
    pub id: i64,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<CourierStatus>,
    pub transport_type: Option<TransportType>,
}

impl CourierPatch {
    /// Patch that only moves a courier to the given status.
    pub fn status_only(id: i64, status: CourierStatus) -> Self {
        Self {
            id,
            name: None,
            phone: None,
            status: Some(status),
            transport_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_round_trip() {
        for s in [
            CourierStatus::Available,
            CourierStatus::Busy,
            CourierStatus::Paused,
        ] {
            assert_eq!(CourierStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(CourierStatus::parse("retired"), None);
    }

    #[test]
    fn test_status_only_patch() {
        let patch = CourierPatch::status_only(7, CourierStatus::Busy);
        assert_eq!(patch.id, 7);
        assert_eq!(patch.status, Some(CourierStatus::Busy));
        assert!(patch.name.is_none());
        assert!(patch.phone.is_none());
        assert!(patch.transport_type.is_none());
    }
}
