//! Human-readable ledger codes and transaction numbers.
//!
//! Storage decides *which* number comes next; this module only decides how
//! numbers look.

use super::error::LedgerError;

/// Minimum width of a ledger code's numeric suffix.
pub const LEDGER_CODE_WIDTH: usize = 4;

/// Minimum width of a transaction number's per-period sequence.
pub const TRANSACTION_SEQUENCE_WIDTH: usize = 6;

/// Parses the numeric suffix of `code` under `prefix`.
///
/// Returns `None` for codes with another prefix or a non-numeric suffix.
#[must_use]
pub fn ledger_code_suffix(prefix: &str, code: &str) -> Option<u64> {
    let suffix = code.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Formats a ledger code, widening past [`LEDGER_CODE_WIDTH`] digits.
#[must_use]
pub fn format_ledger_code(prefix: &str, number: u64) -> String {
    format!("{prefix}{number:0LEDGER_CODE_WIDTH$}")
}

/// Returns the code following the numerically highest of `existing`.
///
/// Codes are compared by number, not text, so `LGR10000` ranks above
/// `LGR9999`.
pub fn next_ledger_code<'a, I>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|code| ledger_code_suffix(prefix, code))
        .max()
        .unwrap_or(0);
    format_ledger_code(prefix, max.saturating_add(1))
}

/// Formats a transaction number: prefix, `YY`, `MM`, and the sequence.
///
/// # Errors
///
/// Returns `InvalidPeriod` for a month outside 1..=12.
pub fn format_transaction_number(
    prefix: &str,
    year: i32,
    month: u32,
    sequence: u64,
) -> Result<String, LedgerError> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::InvalidPeriod { year, month });
    }
    let yy = year.rem_euclid(100);
    Ok(format!(
        "{prefix}{yy:02}{month:02}{sequence:0TRANSACTION_SEQUENCE_WIDTH$}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_first_ledger_code() {
        assert_eq!(next_ledger_code("LGR", []), "LGR0001");
    }

    #[test]
    fn test_next_ledger_code_uses_maximum() {
        let existing = ["LGR0003", "LGR0010", "LGR0002"];
        assert_eq!(next_ledger_code("LGR", existing), "LGR0011");
    }

    #[test]
    fn test_next_ledger_code_widens_past_four_digits() {
        assert_eq!(next_ledger_code("LGR", ["LGR9999"]), "LGR10000");
        assert_eq!(
            next_ledger_code("LGR", ["LGR9999", "LGR10000"]),
            "LGR10001"
        );
    }

    #[test]
    fn test_next_ledger_code_ignores_foreign_codes() {
        let existing = ["ACME0042", "LGR00X1", "LGR", "LGR0005"];
        assert_eq!(next_ledger_code("LGR", existing), "LGR0006");
    }

    #[rstest]
    #[case(2026, 3, 1, "TXN2603000001")]
    #[case(2026, 12, 42, "TXN2612000042")]
    #[case(2100, 1, 7, "TXN0001000007")]
    #[case(2026, 3, 1_234_567, "TXN26031234567")]
    fn test_format_transaction_number(
        #[case] year: i32,
        #[case] month: u32,
        #[case] sequence: u64,
        #[case] expected: &str,
    ) {
        assert_eq!(
            format_transaction_number("TXN", year, month, sequence).unwrap(),
            expected
        );
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn test_format_transaction_number_rejects_bad_month(#[case] month: u32) {
        assert!(matches!(
            format_transaction_number("TXN", 2026, month, 1),
            Err(LedgerError::InvalidPeriod { month: m, .. }) if m == month
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The next code always parses to one more than the largest input.
        #[test]
        fn prop_next_code_exceeds_all_existing(
            numbers in prop::collection::vec(1u64..200_000u64, 0..20),
        ) {
            let codes: Vec<String> = numbers.iter().map(|n| format_ledger_code("LGR", *n)).collect();
            let next = next_ledger_code("LGR", codes.iter().map(String::as_str));
            let parsed = ledger_code_suffix("LGR", &next).unwrap();
            prop_assert_eq!(parsed, numbers.iter().copied().max().unwrap_or(0) + 1);
        }
    }
}
