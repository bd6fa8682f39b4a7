//! PostgreSQL Implementation of DeliveryStore
//!
//! Uses Sea-ORM against the transaction handle supplied by the caller. The
//! partial unique index on `order_id` over active rows turns a concurrent
//! double-assign into `OrderAlreadyAssigned`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, SqlErr,
};

use crate::domain::model::{Delivery, DeliveryStatus, DispatchError, NewDelivery};
use crate::domain::ports::DeliveryStore;
use crate::infrastructure::repository::entities::delivery;

pub struct DeliveryPostgresStore;

impl DeliveryPostgresStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeliveryPostgresStore {
    fn default() -> Self {
        Self::new()
    }
}

fn map_unique_violation(err: DbErr) -> DispatchError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DispatchError::OrderAlreadyAssigned,
        _ => err.into(),
    }
}

#[async_trait]
impl DeliveryStore for DeliveryPostgresStore {
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        new_delivery: NewDelivery,
    ) -> Result<(), DispatchError> {
        use sea_orm::Set;

        let model = delivery::ActiveModel {
            courier_id: Set(new_delivery.courier_id),
            order_id: Set(new_delivery.order_id),
            status: Set(DeliveryStatus::Active.as_str().to_owned()),
            assigned_at: Set(new_delivery.assigned_at),
            deadline: Set(new_delivery.deadline),
            ..Default::default()
        };

        delivery::Entity::insert(model)
            .exec(txn)
            .await
            .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn get_by_order_id(
        &self,
        txn: &DatabaseTransaction,
        order_id: &str,
    ) -> Result<Delivery, DispatchError> {
        let model = delivery::Entity::find()
            .filter(delivery::Column::OrderId.eq(order_id))
            .one(txn)
            .await?
            .ok_or(DispatchError::DeliveryNotFound)?;

        Delivery::try_from(model).map_err(DispatchError::Storage)
    }

    async fn delete_by_order_id(
        &self,
        txn: &DatabaseTransaction,
        order_id: &str,
    ) -> Result<(), DispatchError> {
        let result = delivery::Entity::delete_many()
            .filter(delivery::Column::OrderId.eq(order_id))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(DispatchError::DeliveryNotFound);
        }

        Ok(())
    }

    async fn list_active_expired(
        &self,
        txn: &DatabaseTransaction,
        now: DateTime<Utc>,
    ) -> Result<Vec<Delivery>, DispatchError> {
        let models = delivery::Entity::find()
            .filter(delivery::Column::Status.eq(DeliveryStatus::Active.as_str()))
            .filter(delivery::Column::Deadline.lt(now))
            .all(txn)
            .await?;

        models
            .into_iter()
            .map(|model| Delivery::try_from(model).map_err(DispatchError::Storage))
            .collect()
    }

    async fn update_status_by_ids(
        &self,
        txn: &DatabaseTransaction,
        ids: &[i64],
        status: DeliveryStatus,
    ) -> Result<(), DispatchError> {
        if ids.is_empty() {
            return Ok(());
        }

        delivery::Entity::update_many()
            .col_expr(delivery::Column::Status, Expr::value(status.as_str()))
            .filter(delivery::Column::Id.is_in(ids.iter().copied()))
            .exec(txn)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, TransactionTrait};

    use super::*;

    fn delivery_model(id: i64, order_id: &str, status: &str) -> delivery::Model {
        let now = Utc::now();
        delivery::Model {
            id,
            courier_id: 1,
            order_id: order_id.to_owned(),
            status: status.to_owned(),
            assigned_at: now,
            deadline: now + Duration::minutes(5),
        }
    }

    #[tokio::test]
    async fn test_get_by_order_id_maps_missing_row_to_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<delivery::Model>::new()])
            .into_connection();
        let txn = db.begin().await.unwrap();

        let err = DeliveryPostgresStore::new()
            .get_by_order_id(&txn, "order-1")
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::DeliveryNotFound);
    }

    #[tokio::test]
    async fn test_get_by_order_id_converts_row_of_any_status() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![delivery_model(3, "order-1", "completed")]])
            .into_connection();
        let txn = db.begin().await.unwrap();

        let delivery = DeliveryPostgresStore::new()
            .get_by_order_id(&txn, "order-1")
            .await
            .unwrap();

        assert_eq!(delivery.id, 3);
        assert_eq!(delivery.status, DeliveryStatus::Completed);
    }

    #[tokio::test]
    async fn test_delete_by_order_id_maps_zero_rows_to_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let txn = db.begin().await.unwrap();

        let err = DeliveryPostgresStore::new()
            .delete_by_order_id(&txn, "order-1")
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::DeliveryNotFound);
    }

    #[tokio::test]
    async fn test_update_status_by_ids_empty_ids_is_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let txn = db.begin().await.unwrap();

        DeliveryPostgresStore::new()
            .update_status_by_ids(&txn, &[], DeliveryStatus::Completed)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_active_expired_converts_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                delivery_model(1, "order-1", "active"),
                delivery_model(2, "order-2", "active"),
            ]])
            .into_connection();
        let txn = db.begin().await.unwrap();

        let expired = DeliveryPostgresStore::new()
            .list_active_expired(&txn, Utc::now())
            .await
            .unwrap();

        assert_eq!(expired.len(), 2);
        assert_eq!(expired[0].order_id, "order-1");
    }
}
