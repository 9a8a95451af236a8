//! `SeaORM` Entity for payroll_slips table.

use payledger_core::payroll::SalaryStructure;
use payledger_shared::types::from_minor_units;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PayrollType, SlipStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_slips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub run_id: Uuid,
    pub staff_id: Uuid,
    pub basic_minor: i64,
    pub hra_minor: i64,
    pub conveyance_minor: i64,
    pub accommodation_minor: i64,
    pub allowances_minor: i64,
    pub incentives_minor: i64,
    /// LOP in half days.
    pub lop_half_days: i32,
    pub lop_deduction_minor: i64,
    pub advance_salary_minor: i64,
    pub other_deductions_minor: i64,
    pub gross_total_minor: i64,
    pub net_pay_minor: i64,
    pub total_working_days: i32,
    pub payroll_type: PayrollType,
    pub status: SlipStatus,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Fixed components the slip was drafted with.
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

    /// LOP days, possibly ending in `.5`.
    #[must_use]
    pub fn lop_days(&self) -> Decimal {
        Decimal::new(i64::from(self.lop_half_days) * 5, 1).normalize()
    }

    /// Manual incentive.
    #[must_use]
    pub fn incentives(&self) -> Decimal {
        from_minor_units(self.incentives_minor)
    }

    /// LOP deduction.
    #[must_use]
    pub fn lop_deduction(&self) -> Decimal {
        from_minor_units(self.lop_deduction_minor)
    }

    /// Advance recovered.
    #[must_use]
    pub fn advance_salary(&self) -> Decimal {
        from_minor_units(self.advance_salary_minor)
    }

    /// Manual deduction.
    #[must_use]
    pub fn other_deductions(&self) -> Decimal {
        from_minor_units(self.other_deductions_minor)
    }

    /// Gross earnings.
    #[must_use]
    pub fn gross_total(&self) -> Decimal {
        from_minor_units(self.gross_total_minor)
    }

    /// Take-home pay.
    #[must_use]
    pub fn net_pay(&self) -> Decimal {
        from_minor_units(self.net_pay_minor)
    }

    /// LOP, advance, and manual deductions together.
    #[must_use]
    pub fn total_deductions(&self) -> Decimal {
        self.lop_deduction() + self.advance_salary() + self.other_deductions()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll_runs::Entity",
        from = "Column::RunId",
        to = "super::payroll_runs::Column::Id",
        on_delete = "Cascade"
    )]
    PayrollRuns,
    #[sea_orm(
        belongs_to = "super::staff::Entity",
        from = "Column::StaffId",
        to = "super::staff::Column::Id"
    )]
    Staff,
}

impl Related<super::payroll_runs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRuns.def()
    }
}

impl Related<super::staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
