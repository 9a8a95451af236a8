//! Ledger error types for validation and state errors.
//!
//! This module defines all errors that can occur while allocating sequence
//! numbers, provisioning ledgers, posting, correcting, and reporting on
//! journal entries.

use chrono::NaiveDate;
use payledger_shared::ErrorKind;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines, got {0}")]
    InsufficientLines(usize),

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry amount must be greater than zero.
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// Entry amount differs from the total of its debit legs.
    #[error("Amount {amount} does not match total debit {debit}")]
    AmountMismatch {
        /// Declared amount.
        amount: Decimal,
        /// Total debit of the lines.
        debit: Decimal,
    },

    /// A line must carry either a debit or a credit, not both or neither.
    #[error("Line for ledger {0} must be either a debit or a credit")]
    InvalidLine(Uuid),

    /// A line carries a negative amount.
    #[error("Line for ledger {0} has a negative amount")]
    NegativeLine(Uuid),

    /// Both legs of a two-leg posting hit the same ledger.
    #[error("Cannot post from ledger {0} to itself")]
    SameLedger(Uuid),

    /// Amount edit on an entry whose amount is zero has no defined ratio.
    #[error("Cannot rescale entry {0}: current amount is zero")]
    UndefinedRescaleRatio(Uuid),

    /// Rescaling rounded a line down to nothing.
    #[error("Cannot rescale entry {0}: a line would become zero")]
    RescaleUnderflow(Uuid),

    /// Amount does not fit in storage.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(Decimal),

    /// Month outside 1..=12 or a year that cannot be numbered.
    #[error("Invalid period {year}-{month}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// Statement range starts after it ends.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },

    /// An entity-bound ledger was requested without an identifier or name.
    #[error("Ledger for {0} entities needs an entity id or a name")]
    MissingEntityReference(String),

    /// Ledger name must not be blank.
    #[error("Ledger name must not be empty")]
    EmptyLedgerName,

    // ========== Not Found Errors ==========
    /// Ledger not found.
    #[error("Ledger not found: {0}")]
    LedgerNotFound(Uuid),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Account head missing from the chart of accounts.
    #[error("Account head {0} is missing from the chart of accounts")]
    HeadNotFound(String),

    /// Business entity behind a ledger not found.
    #[error("{entity_type} {entity_id} not found")]
    EntityNotFound {
        /// Kind of entity.
        entity_type: String,
        /// The entity's identifier.
        entity_id: String,
    },

    /// A system ledger (such as the opening balance adjustment) is missing.
    #[error("System ledger '{0}' is missing; seed the chart of accounts")]
    SystemLedgerMissing(String),

    // ========== Conflict Errors ==========
    /// Ledger still owns journal lines.
    #[error("Cannot delete ledger {ledger_id} with {lines} existing journal lines")]
    LedgerHasLines {
        /// The ledger ID.
        ledger_id: Uuid,
        /// Number of lines found.
        lines: u64,
    },

    /// A generated code or number collided with an existing one.
    #[error("Duplicate sequence value {0}, please retry")]
    DuplicateSequence(String),
}

impl LedgerError {
    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientLines(_)
            | Self::UnbalancedEntry { .. }
            | Self::NonPositiveAmount(_)
            | Self::AmountMismatch { .. }
            | Self::InvalidLine(_)
            | Self::NegativeLine(_)
            | Self::SameLedger(_)
            | Self::UndefinedRescaleRatio(_)
            | Self::RescaleUnderflow(_)
            | Self::AmountOutOfRange(_)
            | Self::InvalidPeriod { .. }
            | Self::InvalidDateRange { .. }
            | Self::MissingEntityReference(_)
            | Self::EmptyLedgerName => ErrorKind::Validation,

            Self::LedgerNotFound(_)
            | Self::EntryNotFound(_)
            | Self::HeadNotFound(_)
            | Self::EntityNotFound { .. }
            | Self::SystemLedgerMissing(_) => ErrorKind::NotFound,

            Self::LedgerHasLines { .. } | Self::DuplicateSequence(_) => ErrorKind::Conflict,
        }
    }

    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines(_) => "INSUFFICIENT_LINES",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            Self::InvalidLine(_) => "INVALID_LINE",
            Self::NegativeLine(_) => "NEGATIVE_LINE",
            Self::SameLedger(_) => "SAME_LEDGER",
            Self::UndefinedRescaleRatio(_) => "UNDEFINED_RESCALE_RATIO",
            Self::RescaleUnderflow(_) => "RESCALE_UNDERFLOW",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::MissingEntityReference(_) => "MISSING_ENTITY_REFERENCE",
            Self::EmptyLedgerName => "EMPTY_LEDGER_NAME",
            Self::LedgerNotFound(_) => "LEDGER_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::HeadNotFound(_) => "HEAD_NOT_FOUND",
            Self::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            Self::SystemLedgerMissing(_) => "SYSTEM_LEDGER_MISSING",
            Self::LedgerHasLines { .. } => "LEDGER_HAS_LINES",
            Self::DuplicateSequence(_) => "DUPLICATE_SEQUENCE",
        }
    }
}
