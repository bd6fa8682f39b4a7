//! Transport Model
//!
//! Each transport type maps to a fixed delivery duration. The deadline of a
//! new delivery is the assignment time plus this duration.

use std::fmt;

use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportType {
    OnFoot,
    Scooter,
    Car,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::OnFoot => "on_foot",
            TransportType::Scooter => "scooter",
            TransportType::Car => "car",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "on_foot" => Some(TransportType::OnFoot),
            "scooter" => Some(TransportType::Scooter),
            "car" => Some(TransportType::Car),
            _ => None,
        }
    }

    /// Fixed time budget for completing one delivery.
    pub fn delivery_duration(&self) -> Duration {
        match self {
            TransportType::OnFoot => Duration::minutes(30),
            TransportType::Scooter => Duration::minutes(15),
            TransportType::Car => Duration::minutes(5),
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_durations() {
        assert_eq!(
            TransportType::OnFoot.delivery_duration(),
            Duration::minutes(30)
        );
        assert_eq!(
            TransportType::Scooter.delivery_duration(),
            Duration::minutes(15)
        );
        assert_eq!(TransportType::Car.delivery_duration(), Duration::minutes(5));
    }

    #[test]
    fn test_parse_round_trip() {
        for t in [TransportType::OnFoot, TransportType::Scooter, TransportType::Car] {
            assert_eq!(TransportType::parse(t.as_str()), Some(t));
        }
        assert_eq!(TransportType::parse("teleport"), None);
    }
}
