//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the
//! schema builder so they run on PostgreSQL and SQLite alike.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_parties;
mod m20260301_000002_ledger;
mod m20260301_000003_payroll;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_parties::Migration),
            Box::new(m20260301_000002_ledger::Migration),
            Box::new(m20260301_000003_payroll::Migration),
        ]
    }
}
