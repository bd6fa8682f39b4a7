//! PostgreSQL Persistence
//!
//! Sea-ORM implementations of the store ports plus the transaction
//! coordinator. Driver errors are translated into the dispatch error
//! taxonomy at this boundary.

pub mod courier_postgres;
pub mod delivery_postgres;
pub mod entities;
pub mod tx_postgres;

pub use courier_postgres::CourierPostgresStore;
pub use delivery_postgres::DeliveryPostgresStore;
pub use tx_postgres::PostgresTxCoordinator;

use crate::domain::model::DispatchError;

impl From<sea_orm::DbErr> for DispatchError {
    fn from(err: sea_orm::DbErr) -> Self {
        DispatchError::Storage(err.to_string())
    }
}
