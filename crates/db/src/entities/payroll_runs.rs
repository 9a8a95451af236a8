//! `SeaORM` Entity for payroll_runs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PayrollType, RunStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub year: i32,
    pub month: i32,
    pub status: RunStatus,
    pub payroll_type: PayrollType,
    pub processed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payroll_slips::Entity")]
    PayrollSlips,
}

impl Related<super::payroll_slips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollSlips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
