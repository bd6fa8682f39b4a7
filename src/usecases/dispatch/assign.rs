//! Courier Assignment

use sea_orm::DatabaseTransaction;

use crate::domain::model::{CourierPatch, CourierStatus, DispatchError, NewDelivery};

use super::{AssignResult, DispatchService};

impl DispatchService {
    pub(super) async fn assign_in(
        &self,
        txn: &DatabaseTransaction,
        order_id: &str,
    ) -> Result<AssignResult, DispatchError> {
        // Any delivery row for the order, active or completed, blocks a new
        // assignment.
        match self.deliveries.get_by_order_id(txn, order_id).await {
            Ok(_) => return Err(DispatchError::OrderAlreadyAssigned),
            Err(DispatchError::DeliveryNotFound) => {}
            Err(err) => return Err(err),
        }

        let courier = self.couriers.get_available_with_min_deliveries(txn).await?;

        let assigned_at = self.clock.now();
        let deadline = assigned_at + courier.transport_type.delivery_duration();

        self.deliveries
            .create(
                txn,
                NewDelivery {
                    courier_id: courier.id,
                    order_id: order_id.to_owned(),
                    assigned_at,
                    deadline,
                },
            )
            .await?;

        self.couriers
            .update(
                txn,
                CourierPatch::status_only(courier.id, CourierStatus::Busy),
            )
            .await?;

        Ok(AssignResult {
            courier_id: courier.id,
            order_id: order_id.to_owned(),
            transport_type: courier.transport_type,
            deadline,
        })
    }
}
