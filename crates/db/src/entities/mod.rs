//! `SeaORM` entity definitions.
//!
//! Money columns hold integer minor units (`*_minor`); models expose them
//! as `Decimal` through accessor methods.

pub mod account_heads;
pub mod attendance_records;
pub mod clients;
pub mod holidays;
pub mod journal_entries;
pub mod journal_lines;
pub mod leave_requests;
pub mod ledgers;
pub mod payroll_runs;
pub mod payroll_slips;
pub mod sea_orm_active_enums;
pub mod staff;
pub mod transaction_sequences;

pub mod prelude {
    //! Entity re-exports.
    pub use super::account_heads::Entity as AccountHeads;
    pub use super::attendance_records::Entity as AttendanceRecords;
    pub use super::clients::Entity as Clients;
    pub use super::holidays::Entity as Holidays;
    pub use super::journal_entries::Entity as JournalEntries;
    pub use super::journal_lines::Entity as JournalLines;
    pub use super::leave_requests::Entity as LeaveRequests;
    pub use super::ledgers::Entity as Ledgers;
    pub use super::payroll_runs::Entity as PayrollRuns;
    pub use super::payroll_slips::Entity as PayrollSlips;
    pub use super::staff::Entity as Staff;
    pub use super::transaction_sequences::Entity as TransactionSequences;
}
