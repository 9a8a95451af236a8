//! `SeaORM` Entity for clients table.

use payledger_shared::types::from_minor_units;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Advances received and not yet settled, in minor units.
    pub advance_balance_minor: i64,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Advance received from the client.
    #[must_use]
    pub fn advance_balance(&self) -> Decimal {
        from_minor_units(self.advance_balance_minor)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
