//! Chart-of-accounts seeding.
//!
//! Inserts the fixed account heads and the system ledgers the engine posts
//! against. Safe to run repeatedly: existing rows are left alone.

use chrono::Utc;
use payledger_core::ledger::{EntityType, HeadCode};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums as stored;
use crate::entities::{account_heads, ledgers};
use crate::repositories::chart::ChartOfAccounts;
use crate::repositories::ledger::{CreateLedgerInput, OPENING_BALANCE_LEDGER, SYSTEM_USER, create_in};
use crate::repositories::{SequenceAllocator, StoreResult};

/// System ledgers: name, entity type, and head.
pub const SYSTEM_LEDGERS: [(&str, EntityType, HeadCode); 3] = [
    (OPENING_BALANCE_LEDGER, EntityType::Adjustment, HeadCode::Equity),
    ("Cash in Hand", EntityType::Cash, HeadCode::Assets),
    ("Main Bank Account", EntityType::Bank, HeadCode::Assets),
];

/// Rows inserted by [`seed_chart_of_accounts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Account heads inserted.
    pub heads_created: usize,
    /// System ledgers inserted.
    pub ledgers_created: usize,
}

/// Seeds the fixed heads and the system ledgers.
///
/// # Errors
///
/// Returns an error if a database operation fails.
pub async fn seed_chart_of_accounts(
    db: &DatabaseConnection,
    sequences: &SequenceAllocator,
) -> StoreResult<SeedSummary> {
    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    for head in HeadCode::ALL {
        let exists = account_heads::Entity::find()
            .filter(account_heads::Column::Code.eq(head.code()))
            .one(&txn)
            .await?
            .is_some();
        if exists {
            continue;
        }

        account_heads::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(head.code().to_string()),
            name: Set(head.name().to_string()),
            head_type: Set(head.head_type().into()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;
        summary.heads_created += 1;
    }

    let chart = ChartOfAccounts::load(&txn).await?;

    for (name, entity_type, head) in SYSTEM_LEDGERS {
        let exists = ledgers::Entity::find()
            .filter(ledgers::Column::EntityType.eq(stored::EntityType::from(entity_type)))
            .filter(ledgers::Column::Name.eq(name))
            .one(&txn)
            .await?
            .is_some();
        if exists {
            continue;
        }

        create_in(
            &txn,
            sequences,
            &CreateLedgerInput {
                name: name.to_string(),
                head_id: chart.head_id(head)?,
                entity_type,
                entity_id: None,
                description: Some("System ledger".to_string()),
                opening_balance: None,
                opening_balance_date: None,
                created_by: SYSTEM_USER.to_string(),
            },
        )
        .await?;
        summary.ledgers_created += 1;
    }

    txn.commit().await?;

    info!(
        heads_created = summary.heads_created,
        ledgers_created = summary.ledgers_created,
        "Chart of accounts seeded"
    );
    Ok(summary)
}
