//! Delivery Completion

use sea_orm::DatabaseTransaction;

use crate::domain::model::{CourierStatus, DeliveryStatus, DispatchError};

use super::DispatchService;

impl DispatchService {
    pub(super) async fn complete_in(
        &self,
        txn: &DatabaseTransaction,
        order_id: &str,
    ) -> Result<(), DispatchError> {
        let delivery = self.deliveries.get_by_order_id(txn, order_id).await?;

        self.deliveries
            .update_status_by_ids(txn, &[delivery.id], DeliveryStatus::Completed)
            .await?;

        self.couriers
            .update_status_batch(txn, &[delivery.courier_id], CourierStatus::Available)
            .await?;

        Ok(())
    }
}
