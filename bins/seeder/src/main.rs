//! Database seeder for Payledger development and testing.
//!
//! Applies pending migrations, seeds the account heads and system ledgers,
//! and with `--demo` adds a client and two staff members with their
//! ledgers for local development.
//!
//! Usage: cargo run --bin seeder [-- --demo]

use anyhow::Context;
use chrono::Utc;
use payledger_db::entities::{clients, staff};
use payledger_db::migration::Migrator;
use payledger_db::{ChartOfAccounts, LedgerRepository, SequenceAllocator, seed_chart_of_accounts};
use payledger_shared::AppConfig;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Demo client ID (stable across runs).
const DEMO_CLIENT_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0101);

/// Demo staff: ID, name, staff number, basic, HRA (minor units).
const DEMO_STAFF: [(u128, &str, &str, i64, i64); 2] = [
    (0x0201, "Asha Rao", "EMP0101", 2_500_000, 1_000_000),
    (0x0202, "Bala Menon", "EMP0102", 1_800_000, 600_000),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payledger=info,seeder=info,sea_orm=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let demo = std::env::args().any(|arg| arg == "--demo");

    let db = payledger_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    Migrator::up(&db, None).await.context("migration failed")?;

    let sequences = SequenceAllocator::new(&config.ledger);
    let summary = seed_chart_of_accounts(&db, &sequences).await?;
    info!(
        heads_created = summary.heads_created,
        ledgers_created = summary.ledgers_created,
        "Chart of accounts seeded"
    );

    if demo {
        seed_demo_parties(&db).await?;
        let chart = ChartOfAccounts::load(&db).await?;
        let synced = LedgerRepository::new(db.clone(), chart, sequences)
            .sync_entity_ledgers()
            .await?;
        info!(
            clients = synced.clients,
            staff = synced.staff,
            created = synced.created,
            updated = synced.updated,
            "Demo ledgers synced"
        );
    }

    info!("Seeding complete");
    Ok(())
}

/// Inserts the demo client and staff unless they already exist.
async fn seed_demo_parties(db: &DatabaseConnection) -> anyhow::Result<()> {
    if clients::Entity::find_by_id(DEMO_CLIENT_ID).one(db).await?.is_none() {
        clients::ActiveModel {
            id: Set(DEMO_CLIENT_ID),
            name: Set("Acme Traders".to_string()),
            advance_balance_minor: Set(0),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await?;
        info!(client_id = %DEMO_CLIENT_ID, "Demo client created");
    }

    for (id, name, number, basic, hra) in DEMO_STAFF {
        let id = Uuid::from_u128(id);
        if staff::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }
        staff::ActiveModel {
            id: Set(id),
            full_name: Set(name.to_string()),
            staff_number: Set(Some(number.to_string())),
            basic_minor: Set(basic),
            hra_minor: Set(hra),
            conveyance_minor: Set(0),
            accommodation_minor: Set(0),
            allowances_minor: Set(0),
            advance_balance_minor: Set(0),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await?;
        info!(staff_id = %id, name, "Demo staff member created");
    }

    Ok(())
}
