//! Create Couriers Table Migration
//!
//! Creates the `couriers` table for storing courier profiles.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Couriers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Couriers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Couriers::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Couriers::Phone)
                            .string_len(12)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Couriers::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Couriers::TransportType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Couriers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Couriers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_couriers_status")
                    .table(Couriers::Table)
                    .col(Couriers::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Couriers::Table).to_owned())
            .await
    }
}

/// Couriers table columns
#[derive(Iden)]
pub enum Couriers {
    Table,
    Id,
    Name,
    Phone,
    Status,
    TransportType,
    CreatedAt,
    UpdatedAt,
}
