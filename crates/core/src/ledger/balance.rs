//! Ledger balance calculations.
//!
//! Ledgers store one signed balance in the debit-positive convention:
//! every debit adds and every credit subtracts, whatever the head. The
//! head's nature only decides how that number is read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side increases a ledger.
///
/// - Asset/Expense: debit-normal
/// - Liability/Equity/Income: credit-normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceNature {
    /// Debit-normal ledgers (Asset, Expense)
    DebitNormal,
    /// Credit-normal ledgers (Liability, Equity, Income)
    CreditNormal,
}

impl BalanceNature {
    /// Change of the natural balance caused by one leg.
    #[must_use]
    pub fn natural_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::DebitNormal => debit - credit,
            Self::CreditNormal => credit - debit,
        }
    }

    /// Reads a stored (debit-positive) balance with this nature's sign.
    #[must_use]
    pub fn natural_balance(self, stored: Decimal) -> Decimal {
        match self {
            Self::DebitNormal => stored,
            Self::CreditNormal => -stored,
        }
    }
}

/// Debit and credit totals of one ledger, accumulated from its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBalance {
    /// The ledger ID.
    pub ledger_id: Uuid,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
}

impl LedgerBalance {
    /// Creates an empty balance.
    #[must_use]
    pub const fn new(ledger_id: Uuid) -> Self {
        Self {
            ledger_id,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
        }
    }

    /// Adds one line.
    pub fn add_line(&mut self, debit: Decimal, credit: Decimal) {
        self.debit_total += debit;
        self.credit_total += credit;
    }

    /// Balance in the stored debit-positive convention.
    #[must_use]
    pub fn stored_balance(&self) -> Decimal {
        self.debit_total - self.credit_total
    }

    /// Balance read with the head's sign.
    #[must_use]
    pub fn natural_balance(&self, nature: BalanceNature) -> Decimal {
        nature.natural_change(self.debit_total, self.credit_total)
    }
}

/// Running balance after one statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Balance before this line.
    pub previous_balance: Decimal,
    /// Balance after this line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starts a chain at an opening balance.
    #[must_use]
    pub const fn opening(balance: Decimal) -> Self {
        Self {
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Applies the next change.
    ///
    /// - current_balance[N] = previous_balance[N] + change
    /// - previous_balance[N] = current_balance[N-1]
    #[must_use]
    pub fn next(&self, change: Decimal) -> Self {
        Self {
            previous_balance: self.current_balance,
            current_balance: self.current_balance + change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    /// Strategy for generating non-negative leg amounts
    fn leg_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating a sequence of (debit, credit) legs
    fn legs_strategy(max_len: usize) -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
        prop::collection::vec(
            prop_oneof![
                leg_strategy().prop_map(|d| (d, Decimal::ZERO)),
                leg_strategy().prop_map(|c| (Decimal::ZERO, c)),
            ],
            1..=max_len,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The natural balance of a ledger equals its stored balance read
        /// through the head's sign.
        #[test]
        fn prop_natural_balance_matches_stored(legs in legs_strategy(30)) {
            let mut balance = LedgerBalance::new(Uuid::nil());
            for (debit, credit) in &legs {
                balance.add_line(*debit, *credit);
            }

            for nature in [BalanceNature::DebitNormal, BalanceNature::CreditNormal] {
                prop_assert_eq!(
                    balance.natural_balance(nature),
                    nature.natural_balance(balance.stored_balance())
                );
            }
        }

        /// A running chain over all legs ends at the natural balance.
        #[test]
        fn prop_running_chain_ends_at_natural_balance(
            legs in legs_strategy(30),
            credit_normal in any::<bool>(),
        ) {
            let nature = if credit_normal {
                BalanceNature::CreditNormal
            } else {
                BalanceNature::DebitNormal
            };
            let mut running = RunningBalance::opening(Decimal::ZERO);
            let mut totals = LedgerBalance::new(Uuid::nil());
            for (debit, credit) in &legs {
                let next = running.next(nature.natural_change(*debit, *credit));
                prop_assert_eq!(next.previous_balance, running.current_balance);
                running = next;
                totals.add_line(*debit, *credit);
            }
            prop_assert_eq!(running.current_balance, totals.natural_balance(nature));
        }
    }

    #[test]
    fn test_natural_change() {
        assert_eq!(
            BalanceNature::DebitNormal.natural_change(dec!(100), dec!(0)),
            dec!(100)
        );
        assert_eq!(
            BalanceNature::CreditNormal.natural_change(dec!(100), dec!(0)),
            dec!(-100)
        );
        assert_eq!(
            BalanceNature::CreditNormal.natural_change(dec!(0), dec!(40)),
            dec!(40)
        );
    }

    #[test]
    fn test_ledger_balance_totals() {
        let mut balance = LedgerBalance::new(Uuid::nil());
        balance.add_line(dec!(500), dec!(0));
        balance.add_line(dec!(0), dec!(200));
        assert_eq!(balance.stored_balance(), dec!(300));
        assert_eq!(balance.natural_balance(BalanceNature::CreditNormal), dec!(-300));
    }
}
