//! `SeaORM` Entity for journal_lines table.

use payledger_core::ledger::JournalLineInput;
use payledger_shared::types::from_minor_units;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_id: Uuid,
    pub ledger_id: Uuid,
    /// Position of the line within its entry.
    pub line_no: i32,
    pub debit_minor: i64,
    pub credit_minor: i64,
}

impl Model {
    /// Debit amount.
    #[must_use]
    pub fn debit(&self) -> Decimal {
        from_minor_units(self.debit_minor)
    }

    /// Credit amount.
    #[must_use]
    pub fn credit(&self) -> Decimal {
        from_minor_units(self.credit_minor)
    }

    /// The line as a posting leg.
    #[must_use]
    pub fn to_input(&self) -> JournalLineInput {
        JournalLineInput {
            ledger_id: self.ledger_id,
            debit: self.debit(),
            credit: self.credit(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::EntryId",
        to = "super::journal_entries::Column::Id",
        on_delete = "Cascade"
    )]
    JournalEntries,
    #[sea_orm(
        belongs_to = "super::ledgers::Entity",
        from = "Column::LedgerId",
        to = "super::ledgers::Column::Id"
    )]
    Ledgers,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl Related<super::ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ledgers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
