//! Create Delivery Table Migration
//!
//! Creates the `delivery` table binding couriers to orders. Concurrent
//! assignment of the same order is fenced by a partial unique index over
//! active rows.

use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_couriers::Couriers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Delivery::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Delivery::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Delivery::CourierId).big_integer().not_null())
                    .col(ColumnDef::new(Delivery::OrderId).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Delivery::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Delivery::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Delivery::Deadline)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_courier_id")
                            .from(Delivery::Table, Delivery::CourierId)
                            .to(Couriers::Table, Couriers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One active delivery per order at any instant
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_delivery_order_id_active \
                 ON delivery (order_id) WHERE status = 'active'",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_delivery_status_deadline")
                    .table(Delivery::Table)
                    .col(Delivery::Status)
                    .col(Delivery::Deadline)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Delivery::Table).to_owned())
            .await
    }
}

/// Delivery table columns
#[derive(Iden)]
pub enum Delivery {
    Table,
    Id,
    CourierId,
    OrderId,
    Status,
    AssignedAt,
    Deadline,
}
