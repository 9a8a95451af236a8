//! Application configuration management.

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger numbering configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Payroll settlement configuration.
    #[serde(default)]
    pub payroll: PayrollConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Prefixes for generated ledger codes and transaction numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Prefix of generated ledger codes (`LGR0001`).
    #[serde(default = "default_ledger_code_prefix")]
    pub ledger_code_prefix: String,
    /// Prefix of generated transaction numbers (`TXN2603000001`).
    #[serde(default = "default_transaction_number_prefix")]
    pub transaction_number_prefix: String,
}

fn default_ledger_code_prefix() -> String {
    "LGR".to_string()
}

fn default_transaction_number_prefix() -> String {
    "TXN".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            ledger_code_prefix: default_ledger_code_prefix(),
            transaction_number_prefix: default_transaction_number_prefix(),
        }
    }
}

/// Payroll settlement configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Staff numbers that are never processed by automatic payroll.
    #[serde(default)]
    pub exempt_staff_numbers: Vec<String>,
    /// Name of the ledger salaries are paid from. Falls back to the first
    /// active bank ledger when unset or missing.
    #[serde(default)]
    pub bank_ledger_name: Option<String>,
    /// Offset from UTC used to decide what "today" is for payroll.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

fn default_utc_offset_minutes() -> i32 {
    330 // IST
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            exempt_staff_numbers: Vec::new(),
            bank_ledger_name: None,
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl PayrollConfig {
    /// Returns the configured offset, or UTC when it is out of range.
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("PAYLEDGER")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("payroll.exempt_staff_numbers"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("PAYLEDGER__DATABASE__URL", Some("sqlite::memory:")),
                ("PAYLEDGER__LEDGER__LEDGER_CODE_PREFIX", Some("ACME")),
                ("PAYLEDGER__PAYROLL__EXEMPT_STAFF_NUMBERS", Some("EMP0001,EMP0002")),
                ("PAYLEDGER__PAYROLL__BANK_LEDGER_NAME", Some("Operating Account")),
                ("RUN_MODE", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.ledger.ledger_code_prefix, "ACME");
                assert_eq!(config.ledger.transaction_number_prefix, "TXN");
                assert_eq!(
                    config.payroll.exempt_staff_numbers,
                    vec!["EMP0001".to_string(), "EMP0002".to_string()]
                );
                assert_eq!(
                    config.payroll.bank_ledger_name.as_deref(),
                    Some("Operating Account")
                );
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_vars_unset(["PAYLEDGER__DATABASE__URL", "RUN_MODE"], || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_payroll_defaults() {
        let payroll = PayrollConfig::default();
        assert!(payroll.exempt_staff_numbers.is_empty());
        assert_eq!(payroll.utc_offset().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let payroll = PayrollConfig {
            utc_offset_minutes: 100_000,
            ..PayrollConfig::default()
        };
        assert_eq!(payroll.utc_offset().local_minus_utc(), 0);
    }
}
