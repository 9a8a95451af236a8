//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` in memory and integer minor units
//! (hundredths) at rest, so every database backend stores them exactly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for stored amounts.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to [`MONEY_SCALE`] places, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts an amount into minor units.
///
/// Digits beyond [`MONEY_SCALE`] are rounded half away from zero. Returns
/// `None` when the result does not fit in an `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    round_money(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
}

/// Converts stored minor units back into an amount.
#[must_use]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), 0)]
    #[case(dec!(500), 50_000)]
    #[case(dec!(12.34), 1234)]
    #[case(dec!(-7.5), -750)]
    #[case(dec!(0.005), 1)]
    #[case(dec!(-0.005), -1)]
    #[case(dec!(1.004), 100)]
    fn test_to_minor_units(#[case] amount: Decimal, #[case] expected: i64) {
        assert_eq!(to_minor_units(amount), Some(expected));
    }

    #[test]
    fn test_to_minor_units_overflow() {
        assert_eq!(to_minor_units(Decimal::MAX), None);
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(from_minor_units(123_456), dec!(1234.56));
        assert_eq!(from_minor_units(-1), dec!(-0.01));
        assert_eq!(from_minor_units(0), Decimal::ZERO);
    }
}
