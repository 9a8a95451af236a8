//! Property-based tests for LedgerService.
//!
//! - Entry balance integrity
//! - Post/reverse round trip
//! - Amount-edit proportionality

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::service::LedgerService;
use super::types::{JournalLineInput, JournalLines};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a balanced entry: one debit split across several credits.
fn balanced_lines() -> impl Strategy<Value = (Decimal, Vec<JournalLineInput>)> {
    prop::collection::vec(positive_amount(), 1..6).prop_map(|credits| {
        let total: Decimal = credits.iter().copied().sum();
        let mut lines = vec![JournalLineInput::debit(Uuid::new_v4(), total)];
        lines.extend(
            credits
                .into_iter()
                .map(|amount| JournalLineInput::credit(Uuid::new_v4(), amount)),
        );
        (total, lines)
    })
}

fn apply(balances: &mut BTreeMap<Uuid, Decimal>, changes: &BTreeMap<Uuid, Decimal>) {
    for (ledger_id, change) in changes {
        *balances.entry(*ledger_id).or_insert(Decimal::ZERO) += *change;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every accepted entry balances and its balance changes net to zero.
    #[test]
    fn prop_accepted_entries_balance((amount, lines) in balanced_lines()) {
        let (resolved, totals) =
            LedgerService::resolve_lines(amount, &JournalLines::Lines(lines)).unwrap();
        prop_assert!(totals.is_balanced);
        let net: Decimal = LedgerService::net_balance_changes(&resolved).values().copied().sum();
        prop_assert_eq!(net, Decimal::ZERO);
    }

    /// Posting then reversing restores every balance exactly.
    #[test]
    fn prop_reversal_round_trip(
        (_amount, lines) in balanced_lines(),
        opening in prop::collection::vec(-1_000_000i64..1_000_000i64, 6),
    ) {
        let mut balances: BTreeMap<Uuid, Decimal> = lines
            .iter()
            .zip(opening.iter())
            .map(|(line, cents)| (line.ledger_id, Decimal::new(*cents, 2)))
            .collect();
        let before = balances.clone();

        apply(&mut balances, &LedgerService::net_balance_changes(&lines));
        apply(&mut balances, &LedgerService::reversal_changes(&lines));

        prop_assert_eq!(balances, before);
    }

    /// Rescaled entries still balance, total the new amount, and keep each
    /// leg within a cent per leg of its exact proportional value.
    #[test]
    fn prop_rescale_is_proportional(
        (amount, lines) in balanced_lines(),
        new_amount in positive_amount(),
    ) {
        let scaled = LedgerService::rescale_lines(Uuid::nil(), &lines, amount, new_amount);
        prop_assume!(scaled.is_ok());
        let scaled = scaled.unwrap();

        let totals = LedgerService::calculate_totals(&scaled);
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit, new_amount);

        let tolerance = Decimal::new(1, 2) * Decimal::from(lines.len());
        for (old, new) in lines.iter().zip(scaled.iter()) {
            prop_assert_eq!(old.ledger_id, new.ledger_id);
            let exact = old.debit.max(old.credit) * new_amount / amount;
            let actual = new.debit.max(new.credit);
            prop_assert!((exact - actual).abs() <= tolerance);
        }
    }
}
