//! Error Taxonomy
//!
//! Sentinel errors of the dispatch core. Stores translate driver errors into
//! these variants; services pass them through transactions unchanged so that
//! callers can match on them and the HTTP façade can map them to status
//! codes.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("courier not found")]
    CourierNotFound,

    #[error("courier with this phone already exists")]
    PhoneExists,

    #[error("no available couriers")]
    NoAvailableCouriers,

    #[error("delivery not found")]
    DeliveryNotFound,

    #[error("order already assigned")]
    OrderAlreadyAssigned,

    /// Wrapped database or conversion failure. Surfaced to callers as an
    /// internal error.
    #[error("storage error: {0}")]
    Storage(String),
}
