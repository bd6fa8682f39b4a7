//! Delivery Store Port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseTransaction;

use crate::domain::model::{Delivery, DeliveryStatus, DispatchError, NewDelivery};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryStore: Send + Sync {
    /// Inserts a delivery with status `active`. `OrderAlreadyAssigned` when
    /// an active row for the same order already exists (unique index).
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        delivery: NewDelivery,
    ) -> Result<(), DispatchError>;

    /// Delivery for the given order, regardless of status.
    async fn get_by_order_id(
        &self,
        txn: &DatabaseTransaction,
        order_id: &str,
    ) -> Result<Delivery, DispatchError>;

    /// Physical delete. `DeliveryNotFound` when no row matched.
    async fn delete_by_order_id(
        &self,
        txn: &DatabaseTransaction,
        order_id: &str,
    ) -> Result<(), DispatchError>;

    /// All active deliveries whose deadline has passed.
    async fn list_active_expired(
        &self,
        txn: &DatabaseTransaction,
        now: DateTime<Utc>,
    ) -> Result<Vec<Delivery>, DispatchError>;

    /// Idempotent bulk status set; an empty id list is a no-op success.
    async fn update_status_by_ids(
        &self,
        txn: &DatabaseTransaction,
        ids: &[i64],
        status: DeliveryStatus,
    ) -> Result<(), DispatchError>;
}
