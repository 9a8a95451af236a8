//! Core business logic for Payledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping, sequences, and posting validation
//! - `reports` - Account statements and the financial overview
//! - `payroll` - Loss-of-pay, salary drafts, and settlement posting plans

pub mod ledger;
pub mod payroll;
pub mod reports;
