//! Repository abstractions for data access.
//!
//! Every mutating operation runs inside one database transaction. Internal
//! `*_in` functions take the open transaction so that payroll settlement
//! can provision ledgers and post several entries atomically.

pub mod chart;
pub mod error;
pub mod journal;
pub mod ledger;
pub mod payroll;
pub mod report;
pub mod sequence;

pub use chart::ChartOfAccounts;
pub use error::{StoreError, StoreResult};
pub use journal::{
    EntryWithLines, JournalRepository, LineView, NewJournalEntry, RecordTransactionInput,
    TransactionFilter, TransactionSummary, UpdateTransactionInput,
};
pub use ledger::{
    CreateLedgerInput, EnsureLedger, LedgerFilter, LedgerRepository, LedgerWithHead,
    ProvisionOutcome, ProvisionedLedger, SyncSummary, UpdateLedgerInput,
};
pub use payroll::{
    CreateHolidayInput, PayrollClock, PayrollRepository, PayrollRunDetails, SalaryDraft,
    SaveSlipInput, SettlementSummary, SlipFilter, SlipWithStaff,
};
pub use report::{BalanceCheck, ReportRepository};
pub use sequence::SequenceAllocator;

use payledger_core::ledger::LedgerError;
use payledger_shared::types::to_minor_units;
use rust_decimal::Decimal;

/// Converts an amount into stored minor units.
pub(crate) fn minor(amount: Decimal) -> Result<i64, LedgerError> {
    to_minor_units(amount).ok_or(LedgerError::AmountOutOfRange(amount))
}
