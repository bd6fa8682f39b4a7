//! Expired Courier Release
//!
//! Bulk-completes deliveries whose deadline has passed and frees their
//! couriers. Idempotent: a second run finds no expired rows and changes
//! nothing. A freed courier may still own other active deliveries; the
//! deadline model deliberately frees it anyway.

use std::collections::BTreeSet;

use sea_orm::DatabaseTransaction;
use tracing::info;

use crate::domain::model::{CourierStatus, DeliveryStatus, DispatchError};

use super::DispatchService;

impl DispatchService {
    pub(super) async fn release_expired_in(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<(), DispatchError> {
        let expired = self
            .deliveries
            .list_active_expired(txn, self.clock.now())
            .await?;

        if expired.is_empty() {
            return Ok(());
        }

        let delivery_ids: Vec<i64> = expired.iter().map(|d| d.id).collect();
        let courier_ids: Vec<i64> = expired
            .iter()
            .map(|d| d.courier_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        info!(
            deliveries = delivery_ids.len(),
            couriers = courier_ids.len(),
            "completing expired deliveries"
        );

        self.deliveries
            .update_status_by_ids(txn, &delivery_ids, DeliveryStatus::Completed)
            .await?;

        self.couriers
            .update_status_batch(txn, &courier_ids, CourierStatus::Available)
            .await?;

        Ok(())
    }
}
