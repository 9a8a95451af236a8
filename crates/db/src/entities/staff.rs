//! `SeaORM` Entity for staff table.

use payledger_core::payroll::SalaryStructure;
use payledger_shared::types::from_minor_units;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    pub staff_number: Option<String>,
    pub basic_minor: i64,
    pub hra_minor: i64,
    pub conveyance_minor: i64,
    pub accommodation_minor: i64,
    pub allowances_minor: i64,
    /// Advances paid and not yet recovered, in minor units.
    pub advance_balance_minor: i64,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Fixed monthly salary components.
    #[must_use]
    pub fn salary_structure(&self) -> SalaryStructure {
        SalaryStructure {
            basic: from_minor_units(self.basic_minor),
            hra: from_minor_units(self.hra_minor),
            conveyance: from_minor_units(self.conveyance_minor),
            accommodation: from_minor_units(self.accommodation_minor),
            allowances: from_minor_units(self.allowances_minor),
        }
    }

    /// Advance paid to the staff member.
    #[must_use]
    pub fn advance_balance(&self) -> Decimal {
        from_minor_units(self.advance_balance_minor)
    }

    /// Name of the staff member's salary advance ledger.
    #[must_use]
    pub fn advance_ledger_name(&self) -> String {
        format!("Salary Advance - {}", self.full_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_records::Entity")]
    AttendanceRecords,
    #[sea_orm(has_many = "super::leave_requests::Entity")]
    LeaveRequests,
    #[sea_orm(has_many = "super::payroll_slips::Entity")]
    PayrollSlips,
}

impl Related<super::attendance_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl Related<super::leave_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveRequests.def()
    }
}

impl Related<super::payroll_slips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollSlips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
