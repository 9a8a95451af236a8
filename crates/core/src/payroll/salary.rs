//! Salary draft computation.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::PayPeriod;
use super::error::PayrollError;
use super::types::{PayrollType, SalaryStructure};

/// Days every month is divided into for the daily wage, whatever its length.
pub const PAYROLL_DAY_DIVISOR: u32 = 30;

/// Rounds to whole currency units, half away from zero.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Everything a salary draft is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryInput {
    /// Fixed monthly components.
    pub structure: SalaryStructure,
    /// Full month or till-date proration.
    pub payroll_type: PayrollType,
    /// Day the draft is computed for (see [`SalaryCalculator::calculation_date`]).
    pub calculation_date: NaiveDate,
    /// LOP days, possibly fractional.
    pub lop_days: Decimal,
    /// Outstanding advance to recover.
    pub advance_salary: Decimal,
    /// Manual incentive added to gross.
    pub incentives: Decimal,
    /// Manual deduction.
    pub other_deductions: Decimal,
}

/// Computed figures of one salary draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryFigures {
    /// Monthly fixed pay over [`PAYROLL_DAY_DIVISOR`], unrounded.
    pub daily_wage: Decimal,
    /// Gross earnings, rounded.
    pub gross_total: Decimal,
    /// Days the gross covers.
    pub total_working_days: u32,
    /// LOP days.
    pub lop_days: Decimal,
    /// LOP deduction, rounded.
    pub lop_deduction: Decimal,
    /// Advance recovered.
    pub advance_salary: Decimal,
    /// Manual incentive.
    pub incentives: Decimal,
    /// Manual deduction.
    pub other_deductions: Decimal,
    /// Take-home pay, rounded and never negative.
    pub net_pay: Decimal,
}

/// Salary calculation rules.
pub struct SalaryCalculator;

impl SalaryCalculator {
    /// Picks the day a draft is computed for.
    ///
    /// - MONTHLY: the last day of the month
    /// - TILL_DATE: `as_of` clamped into the month; without one, `today`
    ///   if it falls in the month, otherwise the last day
    #[must_use]
    pub fn calculation_date(
        period: &PayPeriod,
        payroll_type: PayrollType,
        as_of: Option<NaiveDate>,
        today: NaiveDate,
    ) -> NaiveDate {
        match (payroll_type, as_of) {
            (PayrollType::Monthly, _) => period.last_day(),
            (PayrollType::TillDate, Some(as_of)) => period.clamp(as_of),
            (PayrollType::TillDate, None) if period.contains(today) => today,
            (PayrollType::TillDate, None) => period.last_day(),
        }
    }

    /// Computes a salary draft.
    ///
    /// - daily wage = monthly fixed / 30
    /// - MONTHLY gross = monthly fixed + incentives, over 30 days
    /// - TILL_DATE gross = daily wage x day of month + incentives, over
    ///   that many days
    /// - LOP deduction = daily wage x LOP days
    /// - net = max(0, gross - LOP - advance - other deductions)
    ///
    /// # Errors
    ///
    /// Returns `NegativeComponent` when any input amount is negative.
    pub fn compute(input: &SalaryInput) -> Result<SalaryFigures, PayrollError> {
        if let Some(name) = input.structure.negative_component() {
            return Err(PayrollError::NegativeComponent(name));
        }
        for (name, value) in [
            ("lop_days", input.lop_days),
            ("advance_salary", input.advance_salary),
            ("incentives", input.incentives),
            ("other_deductions", input.other_deductions),
        ] {
            if value < Decimal::ZERO {
                return Err(PayrollError::NegativeComponent(name));
            }
        }

        let monthly_fixed = input.structure.monthly_fixed();
        let daily_wage = monthly_fixed / Decimal::from(PAYROLL_DAY_DIVISOR);

        let (gross_total, total_working_days) = match input.payroll_type {
            PayrollType::Monthly => (
                round_currency(monthly_fixed + input.incentives),
                PAYROLL_DAY_DIVISOR,
            ),
            PayrollType::TillDate => {
                let days = input.calculation_date.day();
                (
                    round_currency(daily_wage * Decimal::from(days) + input.incentives),
                    days,
                )
            }
        };

        let lop_deduction = round_currency(daily_wage * input.lop_days);
        let net_pay = round_currency(
            gross_total - lop_deduction - input.advance_salary - input.other_deductions,
        )
        .max(Decimal::ZERO);

        Ok(SalaryFigures {
            daily_wage,
            gross_total,
            total_working_days,
            lop_days: input.lop_days,
            lop_deduction,
            advance_salary: input.advance_salary,
            incentives: input.incentives,
            other_deductions: input.other_deductions,
            net_pay,
        })
    }

    /// Rejects staff excluded from automatic payroll.
    ///
    /// # Errors
    ///
    /// Returns `ExemptEmployee` when `staff_number` is in `exempt`.
    pub fn ensure_not_exempt(
        staff_id: Uuid,
        staff_number: Option<&str>,
        exempt: &[String],
    ) -> Result<(), PayrollError> {
        match staff_number {
            Some(number) if exempt.iter().any(|e| e.eq_ignore_ascii_case(number)) => {
                Err(PayrollError::ExemptEmployee(staff_id))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn basic_only(basic: Decimal) -> SalaryStructure {
        SalaryStructure {
            basic,
            ..SalaryStructure::default()
        }
    }

    fn input(structure: SalaryStructure, payroll_type: PayrollType, day: u32) -> SalaryInput {
        SalaryInput {
            structure,
            payroll_type,
            calculation_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            lop_days: Decimal::ZERO,
            advance_salary: Decimal::ZERO,
            incentives: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
        }
    }

    #[test]
    fn test_two_lop_days_on_nine_thousand() {
        let figures = SalaryCalculator::compute(&SalaryInput {
            lop_days: dec!(2),
            ..input(basic_only(dec!(9000)), PayrollType::Monthly, 31)
        })
        .unwrap();

        assert_eq!(figures.daily_wage, dec!(300));
        assert_eq!(figures.lop_deduction, dec!(600));
        assert_eq!(figures.gross_total, dec!(9000));
        assert_eq!(figures.total_working_days, 30);
        assert_eq!(figures.net_pay, dec!(8400));
    }

    #[test]
    fn test_daily_wage_uses_thirty_days_in_february() {
        let mut base = input(basic_only(dec!(9000)), PayrollType::Monthly, 28);
        base.calculation_date = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let figures = SalaryCalculator::compute(&base).unwrap();
        assert_eq!(figures.daily_wage, dec!(300));
        assert_eq!(figures.total_working_days, 30);
    }

    #[test]
    fn test_till_date_prorates_by_calendar_days() {
        let structure = SalaryStructure {
            basic: dec!(10000),
            hra: dec!(2000),
            ..SalaryStructure::default()
        };
        let figures =
            SalaryCalculator::compute(&input(structure, PayrollType::TillDate, 15)).unwrap();

        assert_eq!(figures.daily_wage, dec!(400));
        assert_eq!(figures.gross_total, dec!(6000));
        assert_eq!(figures.total_working_days, 15);
    }

    #[test]
    fn test_net_pay_never_negative() {
        let figures = SalaryCalculator::compute(&SalaryInput {
            advance_salary: dec!(20000),
            ..input(basic_only(dec!(9000)), PayrollType::Monthly, 31)
        })
        .unwrap();
        assert_eq!(figures.net_pay, Decimal::ZERO);
    }

    #[test]
    fn test_incentives_and_deductions() {
        let figures = SalaryCalculator::compute(&SalaryInput {
            lop_days: dec!(0.5),
            advance_salary: dec!(1000),
            incentives: dec!(500),
            other_deductions: dec!(250),
            ..input(basic_only(dec!(9000)), PayrollType::Monthly, 31)
        })
        .unwrap();

        assert_eq!(figures.gross_total, dec!(9500));
        assert_eq!(figures.lop_deduction, dec!(150));
        assert_eq!(figures.net_pay, dec!(8100));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 7 days of 333.33.. = 2333.33.. -> 2333.
        let figures =
            SalaryCalculator::compute(&input(basic_only(dec!(10000)), PayrollType::TillDate, 7))
                .unwrap();
        assert_eq!(figures.gross_total, dec!(2333));
        assert_eq!(round_currency(dec!(2.5)), dec!(3));
        assert_eq!(round_currency(dec!(-2.5)), dec!(-3));
    }

    #[test]
    fn test_negative_component_rejected() {
        let result = SalaryCalculator::compute(&SalaryInput {
            other_deductions: dec!(-1),
            ..input(basic_only(dec!(9000)), PayrollType::Monthly, 31)
        });
        assert!(matches!(
            result,
            Err(PayrollError::NegativeComponent("other_deductions"))
        ));
    }

    #[rstest]
    #[case(PayrollType::Monthly, Some(10), 20, 31)]
    #[case(PayrollType::TillDate, Some(10), 20, 10)]
    #[case(PayrollType::TillDate, None, 20, 20)]
    fn test_calculation_date(
        #[case] payroll_type: PayrollType,
        #[case] as_of: Option<u32>,
        #[case] today: u32,
        #[case] expected: u32,
    ) {
        let period = PayPeriod::new(2026, 3).unwrap();
        let march = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
        assert_eq!(
            SalaryCalculator::calculation_date(&period, payroll_type, as_of.map(march), march(today)),
            march(expected)
        );
    }

    #[test]
    fn test_calculation_date_outside_month() {
        let period = PayPeriod::new(2026, 3).unwrap();
        let april = NaiveDate::from_ymd_opt(2026, 4, 5).unwrap();
        assert_eq!(
            SalaryCalculator::calculation_date(&period, PayrollType::TillDate, None, april),
            period.last_day()
        );
        assert_eq!(
            SalaryCalculator::calculation_date(&period, PayrollType::TillDate, Some(april), april),
            period.last_day()
        );
    }

    #[test]
    fn test_exempt_staff_rejected() {
        let exempt = vec!["EMP001".to_string()];
        let id = Uuid::nil();
        assert!(matches!(
            SalaryCalculator::ensure_not_exempt(id, Some("emp001"), &exempt),
            Err(PayrollError::ExemptEmployee(_))
        ));
        assert!(SalaryCalculator::ensure_not_exempt(id, Some("EMP002"), &exempt).is_ok());
        assert!(SalaryCalculator::ensure_not_exempt(id, None, &exempt).is_ok());
    }
}
