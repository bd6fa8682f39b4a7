//! Delivery Entity for Sea-ORM
//!
//! Database entity for the `delivery` table.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::domain::model::{Delivery, DeliveryStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "delivery")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub courier_id: i64,
    pub order_id: String,
    pub status: String,
    pub assigned_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courier::Entity",
        from = "Column::CourierId",
        to = "super::courier::Column::Id"
    )]
    Courier,
}

impl Related<super::courier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Delivery {
    type Error = String;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = DeliveryStatus::parse(&model.status)
            .ok_or_else(|| format!("unknown delivery status: {}", model.status))?;

        Ok(Delivery {
            id: model.id,
            courier_id: model.courier_id,
            order_id: model.order_id,
            status,
            assigned_at: model.assigned_at,
            deadline: model.deadline,
        })
    }
}
