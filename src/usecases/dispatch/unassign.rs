//! Courier Unassignment

use sea_orm::DatabaseTransaction;

use crate::domain::model::{CourierPatch, CourierStatus, DispatchError};

use super::{DispatchService, UnassignResult, STATUS_UNASSIGNED};

impl DispatchService {
    pub(super) async fn unassign_in(
        &self,
        txn: &DatabaseTransaction,
        order_id: &str,
    ) -> Result<UnassignResult, DispatchError> {
        let delivery = self.deliveries.get_by_order_id(txn, order_id).await?;
        let courier_id = delivery.courier_id;

        self.deliveries.delete_by_order_id(txn, order_id).await?;

        let courier = self.couriers.get_by_id(txn, courier_id).await?;

        self.couriers
            .update(
                txn,
                CourierPatch::status_only(courier.id, CourierStatus::Available),
            )
            .await?;

        Ok(UnassignResult {
            order_id: order_id.to_owned(),
            status: STATUS_UNASSIGNED,
            courier_id,
        })
    }
}
