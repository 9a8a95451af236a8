//! Property-based tests for LOP calculation.

use chrono::NaiveDate;
use proptest::prelude::*;

use super::calendar::{HolidayCalendar, PayPeriod};
use super::lop::LopCalculator;
use super::types::{AttendanceDay, AttendanceStatus, LeaveSpan};

fn status_strategy() -> impl Strategy<Value = AttendanceStatus> {
    prop_oneof![
        Just(AttendanceStatus::Present),
        Just(AttendanceStatus::Absent),
        Just(AttendanceStatus::HalfDay),
        Just(AttendanceStatus::Leave),
        Just(AttendanceStatus::Regularized),
        Just(AttendanceStatus::Late),
    ]
}

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap_or_default()
}

/// At most one record per day, as storage guarantees.
fn attendance_strategy() -> impl Strategy<Value = Vec<AttendanceDay>> {
    prop::collection::btree_map(1u32..=31, status_strategy(), 0..31).prop_map(|days| {
        days.into_iter()
            .map(|(day, status)| AttendanceDay {
                date: march(day),
                status,
            })
            .collect()
    })
}

fn leaves_strategy() -> impl Strategy<Value = Vec<LeaveSpan>> {
    prop::collection::vec((1u32..=31, 0u32..5, any::<bool>()), 0..4).prop_map(|spans| {
        spans
            .into_iter()
            .map(|(start, len, loss_of_pay)| LeaveSpan {
                start_date: march(start),
                end_date: march((start + len).min(31)),
                loss_of_pay,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// LOP is a pure function of its inputs: input order and repetition do
    /// not change it.
    #[test]
    fn prop_lop_is_deterministic(
        attendance in attendance_strategy(),
        leaves in leaves_strategy(),
        holiday_days in prop::collection::vec(1u32..=31, 0..4),
        as_of in 1u32..=31,
        today in 1u32..=31,
    ) {
        let period = PayPeriod::new(2026, 3).unwrap();
        let holidays: HolidayCalendar = holiday_days.iter().map(|d| (march(*d), false)).collect();

        let first = LopCalculator::calculate(
            &period, Some(march(as_of)), march(today), &attendance, &leaves, &holidays,
        );
        let second = LopCalculator::calculate(
            &period, Some(march(as_of)), march(today), &attendance, &leaves, &holidays,
        );

        let mut reversed_attendance = attendance.clone();
        reversed_attendance.reverse();
        let mut reversed_leaves = leaves.clone();
        reversed_leaves.reverse();
        let shuffled = LopCalculator::calculate(
            &period, Some(march(as_of)), march(today), &reversed_attendance, &reversed_leaves, &holidays,
        );

        prop_assert_eq!(first, second);
        prop_assert_eq!(first, shuffled);
    }

    /// Every LOP component fits inside the scanned window.
    #[test]
    fn prop_lop_components_bounded_by_window(
        attendance in attendance_strategy(),
        as_of in 1u32..=31,
    ) {
        let period = PayPeriod::new(2026, 3).unwrap();
        let lop = LopCalculator::calculate(
            &period, Some(march(as_of)), march(31), &attendance, &[], &HolidayCalendar::new(),
        );
        prop_assert!(lop.absent_days + lop.missing_days + lop.half_days <= as_of);
    }
}
