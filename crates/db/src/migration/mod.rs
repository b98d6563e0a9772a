//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration.

pub use sea_orm_migration::prelude::*;

mod m20241110_000001_school_refs;
mod m20241110_000002_fee_ledger;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241110_000001_school_refs::Migration),
            Box::new(m20241110_000002_fee_ledger::Migration),
        ]
    }
}
