//! Order-Changed Usecase
//!
//! Maps an inbound order-status change to one dispatch call. Sentinels that
//! indicate message redelivery or out-of-order events are swallowed; every
//! other error propagates to the caller.

use std::sync::Arc;

use crate::domain::model::{DispatchError, OrderEvent, OrderStatus};
use crate::usecases::dispatch::DispatchOps;

pub struct OrderChangedUsecase {
    dispatch: Arc<dyn DispatchOps>,
}

impl OrderChangedUsecase {
    pub fn new(dispatch: Arc<dyn DispatchOps>) -> Self {
        Self { dispatch }
    }

    pub async fn process(&self, event: OrderEvent) -> Result<(), DispatchError> {
        match event.status {
            OrderStatus::Created => {
                match self.dispatch.assign_courier(&event.order_id).await {
                    Ok(_) | Err(DispatchError::OrderAlreadyAssigned) => Ok(()),
                    Err(err) => Err(err),
                }
            }
            OrderStatus::Cancelled => {
                match self.dispatch.unassign_courier(&event.order_id).await {
                    Ok(_) | Err(DispatchError::DeliveryNotFound) => Ok(()),
                    Err(err) => Err(err),
                }
            }
            OrderStatus::Completed => {
                match self.dispatch.complete_delivery(&event.order_id).await {
                    Ok(()) | Err(DispatchError::DeliveryNotFound) => Ok(()),
                    Err(err) => Err(err),
                }
            }
        }
    }
}
