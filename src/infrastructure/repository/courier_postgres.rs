//! PostgreSQL Implementation of CourierStore
//!
//! Uses Sea-ORM against the transaction handle supplied by the caller.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, IntoCondition};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, JoinType, Order,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
};

use crate::domain::model::{
    Courier, CourierPatch, CourierStatus, DeliveryStatus, DispatchError, NewCourier,
};
use crate::domain::ports::CourierStore;
use crate::infrastructure::repository::entities::{courier, delivery};

pub struct CourierPostgresStore;

impl CourierPostgresStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CourierPostgresStore {
    fn default() -> Self {
        Self::new()
    }
}

fn map_unique_violation(err: DbErr) -> DispatchError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DispatchError::PhoneExists,
        _ => err.into(),
    }
}

#[async_trait]
impl CourierStore for CourierPostgresStore {
    async fn get_by_id(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> Result<Courier, DispatchError> {
        let model = courier::Entity::find_by_id(id)
            .one(txn)
            .await?
            .ok_or(DispatchError::CourierNotFound)?;

        Courier::try_from(model).map_err(DispatchError::Storage)
    }

    async fn get_all(&self, txn: &DatabaseTransaction) -> Result<Vec<Courier>, DispatchError> {
        let models = courier::Entity::find()
            .order_by_asc(courier::Column::Id)
            .all(txn)
            .await?;

        models
            .into_iter()
            .map(|model| Courier::try_from(model).map_err(DispatchError::Storage))
            .collect()
    }

    async fn create(
        &self,
        txn: &DatabaseTransaction,
        new_courier: NewCourier,
    ) -> Result<i64, DispatchError> {
        let now = Utc::now();
        let model = courier::ActiveModel {
            name: Set(new_courier.name),
            phone: Set(new_courier.phone),
            status: Set(new_courier.status.as_str().to_owned()),
            transport_type: Set(new_courier.transport_type.as_str().to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = courier::Entity::insert(model)
            .exec(txn)
            .await
            .map_err(map_unique_violation)?;

        Ok(result.last_insert_id)
    }

    async fn update(
        &self,
        txn: &DatabaseTransaction,
        patch: CourierPatch,
    ) -> Result<(), DispatchError> {
        let mut model = courier::ActiveModel {
            id: Set(patch.id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(phone) = patch.phone {
            model.phone = Set(phone);
        }
        if let Some(status) = patch.status {
            model.status = Set(status.as_str().to_owned());
        }
        if let Some(transport_type) = patch.transport_type {
            model.transport_type = Set(transport_type.as_str().to_owned());
        }

        match model.update(txn).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(DispatchError::CourierNotFound),
            Err(err) => Err(map_unique_violation(err)),
        }
    }

    async fn get_available_with_min_deliveries(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<Courier, DispatchError> {
        let model = courier::Entity::find()
            .filter(courier::Column::Status.eq(CourierStatus::Available.as_str()))
            .join(
                JoinType::LeftJoin,
                courier::Relation::Delivery.def().on_condition(|_left, right| {
                    Expr::col((right, delivery::Column::Status))
                        .eq(DeliveryStatus::Completed.as_str())
                        .into_condition()
                }),
            )
            .group_by(courier::Column::Id)
            .order_by(
                Expr::col((delivery::Entity, delivery::Column::Id)).count(),
                Order::Asc,
            )
            .order_by_asc(courier::Column::Id)
            .one(txn)
            .await?
            .ok_or(DispatchError::NoAvailableCouriers)?;

        Courier::try_from(model).map_err(DispatchError::Storage)
    }

    async fn update_status_batch(
        &self,
        txn: &DatabaseTransaction,
        ids: &[i64],
        status: CourierStatus,
    ) -> Result<(), DispatchError> {
        if ids.is_empty() {
            return Ok(());
        }

        courier::Entity::update_many()
            .col_expr(courier::Column::Status, Expr::value(status.as_str()))
            .col_expr(courier::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(courier::Column::Id.is_in(ids.iter().copied()))
            .exec(txn)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, TransactionTrait};

    use super::*;
    use crate::domain::model::TransportType;

    fn courier_model(id: i64, status: &str) -> courier::Model {
        let now = Utc::now();
        courier::Model {
            id,
            name: "Ivan".to_owned(),
            phone: "+78005553535".to_owned(),
            status: status.to_owned(),
            transport_type: "car".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_maps_missing_row_to_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<courier::Model>::new()])
            .into_connection();
        let txn = db.begin().await.unwrap();

        let err = CourierPostgresStore::new()
            .get_by_id(&txn, 404)
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::CourierNotFound);
    }

    #[tokio::test]
    async fn test_get_by_id_converts_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![courier_model(1, "available")]])
            .into_connection();
        let txn = db.begin().await.unwrap();

        let courier = CourierPostgresStore::new().get_by_id(&txn, 1).await.unwrap();

        assert_eq!(courier.id, 1);
        assert_eq!(courier.status, CourierStatus::Available);
        assert_eq!(courier.transport_type, TransportType::Car);
    }

    #[tokio::test]
    async fn test_get_by_id_rejects_unknown_status() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![courier_model(1, "retired")]])
            .into_connection();
        let txn = db.begin().await.unwrap();

        let err = CourierPostgresStore::new()
            .get_by_id(&txn, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Storage(_)));
    }

    #[tokio::test]
    async fn test_create_returns_store_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![courier_model(5, "available")]])
            .into_connection();
        let txn = db.begin().await.unwrap();

        let id = CourierPostgresStore::new()
            .create(
                &txn,
                NewCourier {
                    name: "Ivan".to_owned(),
                    phone: "+78005553535".to_owned(),
                    status: CourierStatus::Available,
                    transport_type: TransportType::Car,
                },
            )
            .await
            .unwrap();

        assert_eq!(id, 5);
    }

    #[tokio::test]
    async fn test_get_available_maps_missing_row_to_no_available() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<courier::Model>::new()])
            .into_connection();
        let txn = db.begin().await.unwrap();

        let err = CourierPostgresStore::new()
            .get_available_with_min_deliveries(&txn)
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::NoAvailableCouriers);
    }

    #[tokio::test]
    async fn test_update_status_batch_empty_ids_is_noop() {
        // No results are appended: any issued query would fail the test.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let txn = db.begin().await.unwrap();

        CourierPostgresStore::new()
            .update_status_batch(&txn, &[], CourierStatus::Available)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_status_batch_issues_single_update() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();
        let txn = db.begin().await.unwrap();

        CourierPostgresStore::new()
            .update_status_batch(&txn, &[1, 2], CourierStatus::Busy)
            .await
            .unwrap();
    }
}
