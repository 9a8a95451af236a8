//! Payroll settlement logic.
//!
//! - Pay periods and the holiday calendar
//! - Loss-of-pay (LOP) day calculation
//! - Salary draft figures
//! - Posting plans for accrual and payment entries
//! - Error types for payroll operations

pub mod calendar;
pub mod error;
pub mod lop;
pub mod salary;
pub mod settlement;
pub mod types;

#[cfg(test)]
mod lop_props;

pub use calendar::{HolidayCalendar, PayPeriod};
pub use error::PayrollError;
pub use lop::{LopBreakdown, LopCalculator};
pub use salary::{PAYROLL_DAY_DIVISOR, SalaryCalculator, SalaryFigures, SalaryInput, round_currency};
pub use settlement::{AdvanceShare, PostingPlan, SettlementPlanner, SlipObligation};
pub use types::{
    AttendanceDay, AttendanceStatus, LeaveSpan, PayrollType, RunStatus, SalaryStructure,
    SlipStatus, is_loss_of_pay_leave,
};
