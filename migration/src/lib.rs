//! Dispatch Service Database Migrations
//!
//! Sea-ORM migrations for the couriers and delivery tables.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_couriers;
mod m20260301_000002_create_delivery;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_couriers::Migration),
            Box::new(m20260301_000002_create_delivery::Migration),
        ]
    }
}
