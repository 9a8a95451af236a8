//! Shared types, errors, and configuration for Payledger.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers converting between decimal amounts and stored minor units
//! - Application-wide error types and their error kinds
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
