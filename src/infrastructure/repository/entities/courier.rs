//! Courier Entity for Sea-ORM
//!
//! Database entity for the `couriers` table.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::domain::model::{Courier, CourierStatus, TransportType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "couriers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub status: String,
    pub transport_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::delivery::Entity")]
    Delivery,
}

impl Related<super::delivery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Delivery.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Courier {
    type Error = String;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = CourierStatus::parse(&model.status)
            .ok_or_else(|| format!("unknown courier status: {}", model.status))?;
        let transport_type = TransportType::parse(&model.transport_type)
            .ok_or_else(|| format!("unknown transport type: {}", model.transport_type))?;

        Ok(Courier {
            id: model.id,
            name: model.name,
            phone: model.phone,
            status,
            transport_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
