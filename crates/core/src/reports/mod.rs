//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports:
//! - Account Statement (running balance over a date range)
//! - Financial Overview (income, expense, cash position)

pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::*;
