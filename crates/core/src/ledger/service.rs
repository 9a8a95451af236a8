//! Ledger service for posting validation and correction arithmetic.
//!
//! This module provides the core business logic for validating journal
//! entries before they are persisted, and for rescaling the legs of an
//! entry whose amount is edited.

use std::collections::BTreeMap;

use payledger_shared::types::{round_money, to_minor_units};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{JournalLineInput, JournalLines, PostingTotals};

/// Ledger service for journal entry validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validates an entry's amount and legs and returns the resolved lines.
    ///
    /// This function performs all validation steps:
    /// 1. The amount is positive and storable
    /// 2. The two-leg shorthand is expanded
    /// 3. At least 2 lines remain
    /// 4. Every line is either a debit or a credit, never negative
    /// 5. Debits equal credits
    /// 6. The amount equals the total debit
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails.
    pub fn resolve_lines(
        amount: Decimal,
        lines: &JournalLines,
    ) -> Result<(Vec<JournalLineInput>, PostingTotals), LedgerError> {
        Self::validate_amount(amount)?;

        let resolved = match lines {
            JournalLines::Pair {
                debit_ledger_id,
                credit_ledger_id,
            } => {
                if debit_ledger_id == credit_ledger_id {
                    return Err(LedgerError::SameLedger(*debit_ledger_id));
                }
                vec![
                    JournalLineInput::debit(*debit_ledger_id, amount),
                    JournalLineInput::credit(*credit_ledger_id, amount),
                ]
            }
            JournalLines::Lines(lines) => lines.clone(),
        };

        if resolved.len() < 2 {
            return Err(LedgerError::InsufficientLines(resolved.len()));
        }

        for line in &resolved {
            Self::validate_line(line)?;
        }

        let totals = Self::calculate_totals(&resolved);
        if !totals.is_balanced {
            return Err(LedgerError::UnbalancedEntry {
                debit: totals.debit,
                credit: totals.credit,
            });
        }
        if totals.debit != amount {
            return Err(LedgerError::AmountMismatch {
                amount,
                debit: totals.debit,
            });
        }

        Ok((resolved, totals))
    }

    /// Checks that an amount is positive and fits in storage.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount` or `AmountOutOfRange`.
    pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        if to_minor_units(amount).is_none() {
            return Err(LedgerError::AmountOutOfRange(amount));
        }
        Ok(())
    }

    /// Checks a single line.
    fn validate_line(line: &JournalLineInput) -> Result<(), LedgerError> {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeLine(line.ledger_id));
        }
        if line.debit.is_zero() == line.credit.is_zero() {
            return Err(LedgerError::InvalidLine(line.ledger_id));
        }
        if to_minor_units(line.debit.max(line.credit)).is_none() {
            return Err(LedgerError::AmountOutOfRange(line.debit.max(line.credit)));
        }
        Ok(())
    }

    /// Calculates debit and credit totals.
    #[must_use]
    pub fn calculate_totals(lines: &[JournalLineInput]) -> PostingTotals {
        let debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = lines.iter().map(|l| l.credit).sum();
        PostingTotals {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Net stored-balance change per ledger, ordered by ledger id.
    ///
    /// Storage applies balance updates in this order.
    #[must_use]
    pub fn net_balance_changes(lines: &[JournalLineInput]) -> BTreeMap<Uuid, Decimal> {
        let mut changes = BTreeMap::new();
        for line in lines {
            *changes.entry(line.ledger_id).or_insert(Decimal::ZERO) += line.balance_delta();
        }
        changes
    }

    /// Changes that undo `lines`, ordered by ledger id.
    #[must_use]
    pub fn reversal_changes(lines: &[JournalLineInput]) -> BTreeMap<Uuid, Decimal> {
        let mut changes = Self::net_balance_changes(lines);
        for change in changes.values_mut() {
            *change = -*change;
        }
        changes
    }

    /// Rescales every leg of an entry from `old_amount` to `new_amount`.
    ///
    /// Each leg becomes `leg * new / old` rounded to cents. Rounding
    /// residue on each side is moved onto that side's largest leg so the
    /// result still balances and the debit side totals the new amount.
    ///
    /// # Errors
    ///
    /// - `UndefinedRescaleRatio` when `old_amount` is zero
    /// - `NonPositiveAmount` / `AmountOutOfRange` for a bad `new_amount`
    /// - `RescaleUnderflow` when a leg would round to zero
    pub fn rescale_lines(
        entry_id: Uuid,
        lines: &[JournalLineInput],
        old_amount: Decimal,
        new_amount: Decimal,
    ) -> Result<Vec<JournalLineInput>, LedgerError> {
        if old_amount.is_zero() {
            return Err(LedgerError::UndefinedRescaleRatio(entry_id));
        }
        Self::validate_amount(new_amount)?;

        let scale = |value: Decimal| -> Result<Decimal, LedgerError> {
            value
                .checked_mul(new_amount)
                .and_then(|v| v.checked_div(old_amount))
                .map(round_money)
                .ok_or(LedgerError::AmountOutOfRange(value))
        };

        let mut scaled = lines
            .iter()
            .map(|line| {
                Ok(JournalLineInput {
                    ledger_id: line.ledger_id,
                    debit: scale(line.debit)?,
                    credit: scale(line.credit)?,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        let old_totals = Self::calculate_totals(lines);
        let target = scale(old_totals.debit)?;

        Self::absorb_residue(&mut scaled, target, Side::Debit);
        Self::absorb_residue(&mut scaled, target, Side::Credit);

        if scaled
            .iter()
            .any(|l| l.debit <= Decimal::ZERO && l.credit <= Decimal::ZERO)
        {
            return Err(LedgerError::RescaleUnderflow(entry_id));
        }

        Ok(scaled)
    }

    /// Adds `target - Σside` to the largest leg on one side.
    fn absorb_residue(lines: &mut [JournalLineInput], target: Decimal, side: Side) {
        let total: Decimal = lines.iter().map(|l| side.amount(l)).sum();
        let residue = target - total;
        if residue.is_zero() {
            return;
        }
        let largest = lines
            .iter_mut()
            .filter(|l| side.amount(l) > Decimal::ZERO)
            .reduce(|best, l| if side.amount(l) > side.amount(best) { l } else { best });
        if let Some(line) = largest {
            *side.amount_mut(line) += residue;
        }
    }
}

/// One side of a journal line.
#[derive(Clone, Copy)]
enum Side {
    Debit,
    Credit,
}

impl Side {
    fn amount(self, line: &JournalLineInput) -> Decimal {
        match self {
            Self::Debit => line.debit,
            Self::Credit => line.credit,
        }
    }

    fn amount_mut(self, line: &mut JournalLineInput) -> &mut Decimal {
        match self {
            Self::Debit => &mut line.debit,
            Self::Credit => &mut line.credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids() -> (Uuid, Uuid, Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_pair_expands_to_debit_and_credit() {
        let (expense, bank, _, _) = ids();
        let (lines, totals) = LedgerService::resolve_lines(
            dec!(500),
            &JournalLines::Pair {
                debit_ledger_id: expense,
                credit_ledger_id: bank,
            },
        )
        .unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], JournalLineInput::debit(expense, dec!(500)));
        assert_eq!(lines[1], JournalLineInput::credit(bank, dec!(500)));
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_pair_rejects_same_ledger() {
        let (a, _, _, _) = ids();
        let result = LedgerService::resolve_lines(
            dec!(10),
            &JournalLines::Pair {
                debit_ledger_id: a,
                credit_ledger_id: a,
            },
        );
        assert!(matches!(result, Err(LedgerError::SameLedger(id)) if id == a));
    }

    #[test]
    fn test_rejects_single_line() {
        let (a, _, _, _) = ids();
        let result = LedgerService::resolve_lines(
            dec!(10),
            &JournalLines::Lines(vec![JournalLineInput::debit(a, dec!(10))]),
        );
        assert!(matches!(result, Err(LedgerError::InsufficientLines(1))));
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let (a, b, _, _) = ids();
        let pair = JournalLines::Pair {
            debit_ledger_id: a,
            credit_ledger_id: b,
        };
        assert!(matches!(
            LedgerService::resolve_lines(Decimal::ZERO, &pair),
            Err(LedgerError::NonPositiveAmount(_))
        ));
        assert!(matches!(
            LedgerService::resolve_lines(dec!(-5), &pair),
            Err(LedgerError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_rejects_line_with_both_sides() {
        let (a, b, _, _) = ids();
        let lines = JournalLines::Lines(vec![
            JournalLineInput {
                ledger_id: a,
                debit: dec!(10),
                credit: dec!(10),
            },
            JournalLineInput::credit(b, dec!(10)),
        ]);
        assert!(matches!(
            LedgerService::resolve_lines(dec!(10), &lines),
            Err(LedgerError::InvalidLine(id)) if id == a
        ));
    }

    #[test]
    fn test_rejects_negative_line() {
        let (a, b, _, _) = ids();
        let lines = JournalLines::Lines(vec![
            JournalLineInput::debit(a, dec!(-10)),
            JournalLineInput::credit(b, dec!(10)),
        ]);
        assert!(matches!(
            LedgerService::resolve_lines(dec!(10), &lines),
            Err(LedgerError::NegativeLine(id)) if id == a
        ));
    }

    #[test]
    fn test_rejects_unbalanced_lines() {
        let (a, b, _, _) = ids();
        let lines = JournalLines::Lines(vec![
            JournalLineInput::debit(a, dec!(100)),
            JournalLineInput::credit(b, dec!(90)),
        ]);
        assert!(matches!(
            LedgerService::resolve_lines(dec!(100), &lines),
            Err(LedgerError::UnbalancedEntry { .. })
        ));
    }

    #[test]
    fn test_rejects_amount_mismatch() {
        let (a, b, _, _) = ids();
        let lines = JournalLines::Lines(vec![
            JournalLineInput::debit(a, dec!(100)),
            JournalLineInput::credit(b, dec!(100)),
        ]);
        assert!(matches!(
            LedgerService::resolve_lines(dec!(90), &lines),
            Err(LedgerError::AmountMismatch { .. })
        ));
    }

    #[test]
    fn test_accepts_multi_leg_entry() {
        let (expense, staff_a, staff_b, advance) = ids();
        let lines = JournalLines::Lines(vec![
            JournalLineInput::debit(expense, dec!(2700)),
            JournalLineInput::credit(staff_a, dec!(1000)),
            JournalLineInput::credit(staff_b, dec!(1500)),
            JournalLineInput::credit(advance, dec!(200)),
        ]);
        let (resolved, totals) = LedgerService::resolve_lines(dec!(2700), &lines).unwrap();
        assert_eq!(resolved.len(), 4);
        assert_eq!(totals.debit, dec!(2700));
        assert_eq!(totals.credit, dec!(2700));
    }

    #[test]
    fn test_net_balance_changes_merge_same_ledger() {
        let (a, b, _, _) = ids();
        let lines = [
            JournalLineInput::debit(a, dec!(100)),
            JournalLineInput::debit(a, dec!(50)),
            JournalLineInput::credit(b, dec!(150)),
        ];
        let changes = LedgerService::net_balance_changes(&lines);
        assert_eq!(changes[&a], dec!(150));
        assert_eq!(changes[&b], dec!(-150));

        let reversal = LedgerService::reversal_changes(&lines);
        assert_eq!(reversal[&a], dec!(-150));
        assert_eq!(reversal[&b], dec!(150));
    }

    #[test]
    fn test_rescale_two_legs() {
        let (expense, bank, _, _) = ids();
        let lines = [
            JournalLineInput::debit(expense, dec!(500)),
            JournalLineInput::credit(bank, dec!(500)),
        ];
        let scaled =
            LedgerService::rescale_lines(Uuid::nil(), &lines, dec!(500), dec!(750)).unwrap();
        assert_eq!(scaled[0], JournalLineInput::debit(expense, dec!(750)));
        assert_eq!(scaled[1], JournalLineInput::credit(bank, dec!(750)));
    }

    #[test]
    fn test_rescale_absorbs_rounding_residue() {
        let (expense, a, b, c) = ids();
        let lines = [
            JournalLineInput::debit(expense, dec!(300)),
            JournalLineInput::credit(a, dec!(100)),
            JournalLineInput::credit(b, dec!(100)),
            JournalLineInput::credit(c, dec!(100)),
        ];
        let scaled =
            LedgerService::rescale_lines(Uuid::nil(), &lines, dec!(300), dec!(100)).unwrap();
        let totals = LedgerService::calculate_totals(&scaled);
        assert!(totals.is_balanced);
        assert_eq!(totals.debit, dec!(100));
        let credits: Vec<Decimal> = scaled[1..].iter().map(|l| l.credit).collect();
        assert_eq!(credits, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    }

    #[test]
    fn test_rescale_rejects_zero_old_amount() {
        let (a, b, _, _) = ids();
        let entry = Uuid::new_v4();
        let lines = [
            JournalLineInput::debit(a, dec!(1)),
            JournalLineInput::credit(b, dec!(1)),
        ];
        assert!(matches!(
            LedgerService::rescale_lines(entry, &lines, Decimal::ZERO, dec!(10)),
            Err(LedgerError::UndefinedRescaleRatio(id)) if id == entry
        ));
    }

    #[test]
    fn test_rescale_rejects_non_positive_new_amount() {
        let (a, b, _, _) = ids();
        let lines = [
            JournalLineInput::debit(a, dec!(1)),
            JournalLineInput::credit(b, dec!(1)),
        ];
        assert!(matches!(
            LedgerService::rescale_lines(Uuid::nil(), &lines, dec!(1), Decimal::ZERO),
            Err(LedgerError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_rescale_underflow() {
        let (a, b, c, _) = ids();
        let lines = [
            JournalLineInput::debit(a, dec!(1000)),
            JournalLineInput::credit(b, dec!(999.99)),
            JournalLineInput::credit(c, dec!(0.01)),
        ];
        assert!(matches!(
            LedgerService::rescale_lines(Uuid::nil(), &lines, dec!(1000), dec!(100)),
            Err(LedgerError::RescaleUnderflow(_))
        ));
    }
}
