//! Common types used across the application.

pub mod money;

pub use money::{MONEY_SCALE, from_minor_units, round_money, to_minor_units};
