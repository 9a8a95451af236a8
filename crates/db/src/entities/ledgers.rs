//! `SeaORM` Entity for ledgers table.

use payledger_shared::types::from_minor_units;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EntityType, LedgerStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub ledger_code: String,
    pub name: String,
    pub head_id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
    pub description: Option<String>,
    /// Debit-positive balance in minor units.
    pub balance_minor: i64,
    pub status: LedgerStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Stored (debit-positive) balance.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        from_minor_units(self.balance_minor)
    }

    /// `name (code)` as shown in transaction lists.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.ledger_code)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account_heads::Entity",
        from = "Column::HeadId",
        to = "super::account_heads::Column::Id"
    )]
    AccountHeads,
    #[sea_orm(has_many = "super::journal_lines::Entity")]
    JournalLines,
}

impl Related<super::account_heads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountHeads.def()
    }
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
