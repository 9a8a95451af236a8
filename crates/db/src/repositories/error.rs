//! Storage error type shared by all repositories.

use payledger_core::ledger::LedgerError;
use payledger_core::payroll::PayrollError;
use payledger_shared::{AppError, ErrorKind};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Ledger rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Payroll rule violated.
    #[error(transparent)]
    Payroll(#[from] PayrollError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(err) => err.kind(),
            Self::Payroll(err) => err.kind(),
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::Payroll(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Maps a unique-constraint violation on a generated value to
    /// `DuplicateSequence`; other errors pass through.
    pub(crate) fn from_insert(err: DbErr, value: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::Ledger(LedgerError::DuplicateSequence(value.to_string()))
            }
            _ => Self::Database(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(db) => Self::Database(db.to_string()),
            other => Self::from_kind(other.kind(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_kinds_delegate() {
        let err = StoreError::from(LedgerError::EntryNotFound(Uuid::nil()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.error_code(), "ENTRY_NOT_FOUND");

        let err = StoreError::from(PayrollError::ExemptEmployee(Uuid::nil()));
        assert_eq!(err.kind(), ErrorKind::Policy);

        let err = StoreError::from(DbErr::Custom("boom".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = StoreError::from(PayrollError::SlipAlreadyPaid(Uuid::nil())).into();
        assert!(matches!(app, AppError::Conflict(_)));

        let app: AppError = StoreError::from(DbErr::Custom("boom".into())).into();
        assert!(matches!(app, AppError::Database(_)));
    }

    #[test]
    fn test_non_unique_insert_error_passes_through() {
        let err = StoreError::from_insert(DbErr::Custom("boom".into()), "LGR0001");
        assert!(matches!(err, StoreError::Database(_)));
    }
}
