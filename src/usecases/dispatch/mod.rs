//! Dispatch Service
//!
//! The transactional core of the system: creates and removes deliveries and
//! keeps courier status consistent with them under concurrent load. Every
//! operation runs inside a single database transaction obtained from the
//! coordinator; sentinel errors pass through the scope unchanged so the
//! façades can map them.

mod assign;
mod complete;
mod release_expired;
mod unassign;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::clock::Clock;
use crate::domain::model::{DispatchError, TransportType};
use crate::domain::ports::{CourierStore, DeliveryStore, TxCoordinator};
use crate::metrics;
use crate::usecases::finish_tx;

/// Status reported for an order whose delivery was removed.
pub const STATUS_UNASSIGNED: &str = "unassigned";

#[derive(Debug, Clone, PartialEq)]
pub struct AssignResult {
    pub courier_id: i64,
    pub order_id: String,
    pub transport_type: TransportType,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnassignResult {
    pub order_id: String,
    pub status: &'static str,
    pub courier_id: i64,
}

/// Operations of the dispatch core, as consumed by the HTTP façade, the
/// order-changed usecase, and the workers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchOps: Send + Sync {
    async fn assign_courier(&self, order_id: &str) -> Result<AssignResult, DispatchError>;
    async fn unassign_courier(&self, order_id: &str) -> Result<UnassignResult, DispatchError>;
    async fn complete_delivery(&self, order_id: &str) -> Result<(), DispatchError>;
    async fn release_expired_couriers(&self) -> Result<(), DispatchError>;
}

pub struct DispatchService {
    deliveries: Arc<dyn DeliveryStore>,
    couriers: Arc<dyn CourierStore>,
    tx: Arc<dyn TxCoordinator>,
    clock: Arc<dyn Clock>,
}

impl DispatchService {
    pub fn new(
        deliveries: Arc<dyn DeliveryStore>,
        couriers: Arc<dyn CourierStore>,
        tx: Arc<dyn TxCoordinator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            deliveries,
            couriers,
            tx,
            clock,
        }
    }
}

#[async_trait]
impl DispatchOps for DispatchService {
    async fn assign_courier(&self, order_id: &str) -> Result<AssignResult, DispatchError> {
        let txn = self.tx.begin().await?;
        let outcome = self.assign_in(&txn, order_id).await;
        let result = finish_tx(txn, outcome).await?;

        metrics::OPS_TOTAL.inc();
        Ok(result)
    }

    async fn unassign_courier(&self, order_id: &str) -> Result<UnassignResult, DispatchError> {
        let txn = self.tx.begin().await?;
        let outcome = self.unassign_in(&txn, order_id).await;
        let result = finish_tx(txn, outcome).await?;

        metrics::OPS_TOTAL.inc();
        Ok(result)
    }

    async fn complete_delivery(&self, order_id: &str) -> Result<(), DispatchError> {
        let txn = self.tx.begin().await?;
        let outcome = self.complete_in(&txn, order_id).await;
        finish_tx(txn, outcome).await
    }

    async fn release_expired_couriers(&self) -> Result<(), DispatchError> {
        let txn = self.tx.begin().await?;
        let outcome = self.release_expired_in(&txn).await;
        finish_tx(txn, outcome).await
    }
}
