//! Courier Store Port

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use crate::domain::model::{Courier, CourierPatch, CourierStatus, DispatchError, NewCourier};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourierStore: Send + Sync {
    async fn get_by_id(&self, txn: &DatabaseTransaction, id: i64)
        -> Result<Courier, DispatchError>;

    /// All couriers ordered by id ascending. An empty list is a normal
    /// result.
    async fn get_all(&self, txn: &DatabaseTransaction) -> Result<Vec<Courier>, DispatchError>;

    /// Inserts a courier and returns the store-assigned id.
    /// `PhoneExists` on a phone unique-constraint violation.
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        courier: NewCourier,
    ) -> Result<i64, DispatchError>;

    /// Partial update; `None` fields are preserved and `updated_at` is set
    /// to now. `CourierNotFound` when no row matches the id.
    async fn update(
        &self,
        txn: &DatabaseTransaction,
        patch: CourierPatch,
    ) -> Result<(), DispatchError>;

    /// One available courier with the fewest completed deliveries.
    /// `NoAvailableCouriers` when none exists.
    async fn get_available_with_min_deliveries(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<Courier, DispatchError>;

    /// Idempotent bulk status set; an empty id list is a no-op success.
    async fn update_status_batch(
        &self,
        txn: &DatabaseTransaction,
        ids: &[i64],
        status: CourierStatus,
    ) -> Result<(), DispatchError>;
}
