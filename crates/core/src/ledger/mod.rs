//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Account head and entity types
//! - Balance nature rules and running balances
//! - Ledger code and transaction number formatting
//! - Posting validation and amount-edit rescaling
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod sequence;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{BalanceNature, LedgerBalance, RunningBalance};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    EntityType, EntryNature, EntryType, HeadCode, HeadType, JournalLineInput, JournalLines,
    PostingTotals,
};
