//! Payroll error types.

use payledger_shared::ErrorKind;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while drafting, saving, or settling payroll.
#[derive(Debug, Error)]
pub enum PayrollError {
    // ========== Validation Errors ==========
    /// Month outside 1..=12 or a year without a calendar.
    #[error("Invalid payroll period {year}-{month}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// A salary component or manual adjustment is negative.
    #[error("Salary component '{0}' must not be negative")]
    NegativeComponent(&'static str),

    /// A slip's advance deduction is not fully assigned to ledgers.
    #[error("Staff member {0} has an advance deduction not covered by advance ledgers")]
    AdvanceLedgerMissing(Uuid),

    // ========== Not Found Errors ==========
    /// Staff member not found.
    #[error("Staff member not found: {0}")]
    StaffNotFound(Uuid),

    /// Payroll slip not found.
    #[error("Payroll slip not found: {0}")]
    SlipNotFound(Uuid),

    /// No payroll run exists for the period.
    #[error("No payroll run for {month}/{year}")]
    RunNotFound {
        /// Run year.
        year: i32,
        /// Run month.
        month: u32,
    },

    /// Holiday not found.
    #[error("Holiday not found: {0}")]
    HolidayNotFound(Uuid),

    // ========== Conflict Errors ==========
    /// Slip has already been settled.
    #[error("Payroll slip {0} is already paid")]
    SlipAlreadyPaid(Uuid),

    /// Run has already been confirmed.
    #[error("Payroll run for {month}/{year} is already paid")]
    RunAlreadyPaid {
        /// Run year.
        year: i32,
        /// Run month.
        month: u32,
    },

    /// Slips cannot be saved into a confirmed run.
    #[error("Payroll for {month}/{year} is locked")]
    PayrollLocked {
        /// Run year.
        year: i32,
        /// Run month.
        month: u32,
    },

    // ========== Policy Errors ==========
    /// Staff member is excluded from automatic payroll.
    #[error("Staff member {0} is exempt from automatic payroll")]
    ExemptEmployee(Uuid),
}

impl PayrollError {
    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPeriod { .. }
            | Self::NegativeComponent(_)
            | Self::AdvanceLedgerMissing(_) => ErrorKind::Validation,

            Self::StaffNotFound(_)
            | Self::SlipNotFound(_)
            | Self::RunNotFound { .. }
            | Self::HolidayNotFound(_) => ErrorKind::NotFound,

            Self::SlipAlreadyPaid(_) | Self::RunAlreadyPaid { .. } | Self::PayrollLocked { .. } => {
                ErrorKind::Conflict
            }

            Self::ExemptEmployee(_) => ErrorKind::Policy,
        }
    }

    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::NegativeComponent(_) => "NEGATIVE_COMPONENT",
            Self::AdvanceLedgerMissing(_) => "ADVANCE_LEDGER_MISSING",
            Self::StaffNotFound(_) => "STAFF_NOT_FOUND",
            Self::SlipNotFound(_) => "SLIP_NOT_FOUND",
            Self::RunNotFound { .. } => "RUN_NOT_FOUND",
            Self::HolidayNotFound(_) => "HOLIDAY_NOT_FOUND",
            Self::SlipAlreadyPaid(_) => "SLIP_ALREADY_PAID",
            Self::RunAlreadyPaid { .. } => "RUN_ALREADY_PAID",
            Self::PayrollLocked { .. } => "PAYROLL_LOCKED",
            Self::ExemptEmployee(_) => "EXEMPT_EMPLOYEE",
        }
    }
}
