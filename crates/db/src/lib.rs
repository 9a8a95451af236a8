//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Database migrations
//! - Repositories for the chart of accounts, journal postings, reports,
//!   and payroll settlement
//! - Chart-of-accounts seeding

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod seed;

pub use seed::{SeedSummary, seed_chart_of_accounts};
pub use repositories::{
    ChartOfAccounts, JournalRepository, LedgerRepository, PayrollRepository, ReportRepository,
    SequenceAllocator, StoreError, StoreResult,
};

use std::time::Duration;

use payledger_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
