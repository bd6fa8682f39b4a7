//! Courier Admin Service
//!
//! CRUD operations on couriers for the HTTP admin surface. Each operation
//! runs in its own short transaction scope from the coordinator.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::model::{Courier, CourierPatch, DispatchError, NewCourier};
use crate::domain::ports::{CourierStore, TxCoordinator};
use crate::usecases::finish_tx;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourierAdminOps: Send + Sync {
    async fn get_courier(&self, id: i64) -> Result<Courier, DispatchError>;
    async fn get_all_couriers(&self) -> Result<Vec<Courier>, DispatchError>;
    async fn create_courier(&self, courier: NewCourier) -> Result<i64, DispatchError>;
    async fn update_courier(&self, patch: CourierPatch) -> Result<(), DispatchError>;
}

pub struct CourierAdminService {
    couriers: Arc<dyn CourierStore>,
    tx: Arc<dyn TxCoordinator>,
}

impl CourierAdminService {
    pub fn new(couriers: Arc<dyn CourierStore>, tx: Arc<dyn TxCoordinator>) -> Self {
        Self { couriers, tx }
    }
}

#[async_trait]
impl CourierAdminOps for CourierAdminService {
    async fn get_courier(&self, id: i64) -> Result<Courier, DispatchError> {
        let txn = self.tx.begin().await?;
        let outcome = self.couriers.get_by_id(&txn, id).await;
        finish_tx(txn, outcome).await
    }

    async fn get_all_couriers(&self) -> Result<Vec<Courier>, DispatchError> {
        let txn = self.tx.begin().await?;
        let outcome = self.couriers.get_all(&txn).await;
        finish_tx(txn, outcome).await
    }

    async fn create_courier(&self, courier: NewCourier) -> Result<i64, DispatchError> {
        let txn = self.tx.begin().await?;
        let outcome = self.couriers.create(&txn, courier).await;
        finish_tx(txn, outcome).await
    }

    async fn update_courier(&self, patch: CourierPatch) -> Result<(), DispatchError> {
        let txn = self.tx.begin().await?;
        let outcome = self.couriers.update(&txn, patch).await;
        finish_tx(txn, outcome).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::domain::model::{CourierStatus, TransportType};
    use crate::domain::ports::MockCourierStore;
    use crate::infrastructure::repository::PostgresTxCoordinator;

    fn tx_coordinator() -> Arc<dyn TxCoordinator> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        Arc::new(PostgresTxCoordinator::new(db))
    }

    #[tokio::test]
    async fn test_create_returns_store_assigned_id() {
        let mut couriers = MockCourierStore::new();
        couriers
            .expect_create()
            .withf(|_, courier| courier.phone == "+78005553535")
            .times(1)
            .returning(|_, _| Ok(1));

        let service = CourierAdminService::new(Arc::new(couriers), tx_coordinator());

        let id = service
            .create_courier(NewCourier {
                name: "Ivan".to_owned(),
                phone: "+78005553535".to_owned(),
                status: CourierStatus::Available,
                transport_type: TransportType::Car,
            })
            .await
            .unwrap();

        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn test_get_courier_propagates_not_found() {
        let mut couriers = MockCourierStore::new();
        couriers
            .expect_get_by_id()
            .returning(|_, _| Err(DispatchError::CourierNotFound));

        let service = CourierAdminService::new(Arc::new(couriers), tx_coordinator());

        let err = service.get_courier(404).await.unwrap_err();
        assert_eq!(err, DispatchError::CourierNotFound);
    }

    #[tokio::test]
    async fn test_update_propagates_phone_conflict() {
        let mut couriers = MockCourierStore::new();
        couriers
            .expect_update()
            .returning(|_, _| Err(DispatchError::PhoneExists));

        let service = CourierAdminService::new(Arc::new(couriers), tx_coordinator());

        let err = service
            .update_courier(CourierPatch {
                id: 1,
                name: None,
                phone: Some("+78005553535".to_owned()),
                status: None,
                transport_type: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::PhoneExists);
    }

    #[tokio::test]
    async fn test_get_all_returns_empty_list() {
        let mut couriers = MockCourierStore::new();
        couriers.expect_get_all().returning(|_| Ok(vec![]));

        let service = CourierAdminService::new(Arc::new(couriers), tx_coordinator());

        let couriers = service.get_all_couriers().await.unwrap();
        assert!(couriers.is_empty());
    }
}
