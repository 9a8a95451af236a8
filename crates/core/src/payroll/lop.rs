//! Loss-of-pay day calculation.
//!
//! LOP is counted in half days so that every sum stays exact:
//! - ABSENT without a covering approved leave: 2 half days
//! - HALF_DAY: 1 half day
//! - each day of an approved unpaid leave inside the window: 2 half days
//! - each working day up to today with no record and no leave: 2 half days

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calendar::{HolidayCalendar, PayPeriod};
use super::types::{AttendanceDay, AttendanceStatus, LeaveSpan};

/// Components of a staff member's LOP for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LopBreakdown {
    /// First day scanned; `None` when the window is empty.
    pub window_start: Option<NaiveDate>,
    /// Last day scanned; `None` when the window is empty.
    pub window_end: Option<NaiveDate>,
    /// ABSENT records not covered by an approved leave.
    pub absent_days: u32,
    /// HALF_DAY records.
    pub half_days: u32,
    /// Days of approved unpaid leave inside the window.
    pub unpaid_leave_days: u32,
    /// Working days with no attendance record and no leave.
    pub missing_days: u32,
}

impl LopBreakdown {
    /// Total LOP in half days.
    #[must_use]
    pub const fn total_half_days(&self) -> u32 {
        (self.absent_days + self.unpaid_leave_days + self.missing_days) * 2 + self.half_days
    }

    /// Total LOP in days, possibly ending in `.5`.
    #[must_use]
    pub fn total_days(&self) -> Decimal {
        Decimal::new(i64::from(self.total_half_days()) * 5, 1).normalize()
    }
}

/// Computes LOP days from attendance, approved leaves, and holidays.
pub struct LopCalculator;

impl LopCalculator {
    /// Calculates the LOP breakdown for `period`.
    ///
    /// The window runs from the first of the month to `as_of` (or the month
    /// end when `as_of` is `None` or later). `leaves` must hold approved
    /// requests only. Missing days are counted up to `today` at most, so
    /// future days never count as silent absences.
    #[must_use]
    pub fn calculate(
        period: &PayPeriod,
        as_of: Option<NaiveDate>,
        today: NaiveDate,
        attendance: &[AttendanceDay],
        leaves: &[LeaveSpan],
        holidays: &HolidayCalendar,
    ) -> LopBreakdown {
        let window_start = period.first_day();
        let window_end = as_of.map_or(period.last_day(), |d| d.min(period.last_day()));
        if window_end < window_start {
            return LopBreakdown::default();
        }

        let covered = |date: NaiveDate| leaves.iter().any(|leave| leave.covers(date));
        let in_window = |date: NaiveDate| window_start <= date && date <= window_end;

        let mut breakdown = LopBreakdown {
            window_start: Some(window_start),
            window_end: Some(window_end),
            ..LopBreakdown::default()
        };

        let mut recorded = BTreeSet::new();
        for day in attendance.iter().filter(|day| in_window(day.date)) {
            recorded.insert(day.date);
            match day.status {
                AttendanceStatus::Absent if !covered(day.date) => breakdown.absent_days += 1,
                AttendanceStatus::HalfDay => breakdown.half_days += 1,
                _ => {}
            }
        }

        breakdown.unpaid_leave_days = leaves
            .iter()
            .filter(|leave| leave.loss_of_pay)
            .map(|leave| leave.days_within(window_start, window_end))
            .sum();

        let scan_end = window_end.min(today);
        breakdown.missing_days = window_start
            .iter_days()
            .take_while(|date| *date <= scan_end)
            .filter(|date| {
                date.weekday() != Weekday::Sun
                    && !recorded.contains(date)
                    && !holidays.is_holiday(*date)
                    && !covered(*date)
            })
            .fold(0, |count, _| count + 1);

        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn march() -> PayPeriod {
        PayPeriod::new(2026, 3).unwrap()
    }

    fn day(date: NaiveDate, status: AttendanceStatus) -> AttendanceDay {
        AttendanceDay { date, status }
    }

    /// Present on every day of March except the given ones.
    fn present_except(skip: &[u32]) -> Vec<AttendanceDay> {
        (1..=31)
            .filter(|n| !skip.contains(n))
            .map(|n| day(d(n), AttendanceStatus::Present))
            .collect()
    }

    #[test]
    fn test_two_absences_count_two_days() {
        let mut attendance = present_except(&[10, 11]);
        attendance.push(day(d(10), AttendanceStatus::Absent));
        attendance.push(day(d(11), AttendanceStatus::Absent));

        let lop = LopCalculator::calculate(
            &march(),
            None,
            d(31),
            &attendance,
            &[],
            &HolidayCalendar::new(),
        );

        assert_eq!(lop.absent_days, 2);
        assert_eq!(lop.missing_days, 0);
        assert_eq!(lop.total_days(), dec!(2));
    }

    #[test]
    fn test_absence_covered_by_paid_leave_is_free() {
        let mut attendance = present_except(&[10]);
        attendance.push(day(d(10), AttendanceStatus::Absent));
        let leave = LeaveSpan {
            start_date: d(10),
            end_date: d(10),
            loss_of_pay: false,
        };

        let lop = LopCalculator::calculate(
            &march(),
            None,
            d(31),
            &attendance,
            &[leave],
            &HolidayCalendar::new(),
        );

        assert_eq!(lop.total_half_days(), 0);
    }

    #[test]
    fn test_unpaid_leave_counted_once() {
        let mut attendance = present_except(&[10, 11, 12]);
        attendance.push(day(d(10), AttendanceStatus::Absent));
        let leave = LeaveSpan {
            start_date: d(10),
            end_date: d(12),
            loss_of_pay: true,
        };

        let lop = LopCalculator::calculate(
            &march(),
            None,
            d(31),
            &attendance,
            &[leave],
            &HolidayCalendar::new(),
        );

        assert_eq!(lop.absent_days, 0);
        assert_eq!(lop.unpaid_leave_days, 3);
        assert_eq!(lop.missing_days, 0);
        assert_eq!(lop.total_days(), dec!(3));
    }

    #[test]
    fn test_half_day_counts_half() {
        let mut attendance = present_except(&[5]);
        attendance.push(day(d(5), AttendanceStatus::HalfDay));

        let lop = LopCalculator::calculate(
            &march(),
            None,
            d(31),
            &attendance,
            &[],
            &HolidayCalendar::new(),
        );

        assert_eq!(lop.total_half_days(), 1);
        assert_eq!(lop.total_days(), dec!(0.5));
    }

    #[test]
    fn test_missing_days_skip_sundays_and_holidays() {
        // 2026-03-01 is a Sunday; the 2nd is a holiday; nothing recorded
        // for the 1st..=4th.
        let attendance = present_except(&[1, 2, 3, 4]);
        let holidays: HolidayCalendar = [(d(2), false)].into_iter().collect();

        let lop = LopCalculator::calculate(&march(), None, d(31), &attendance, &[], &holidays);

        assert_eq!(lop.missing_days, 2);
    }

    #[test]
    fn test_missing_days_stop_at_today() {
        let lop = LopCalculator::calculate(
            &march(),
            None,
            d(3),
            &[],
            &[],
            &HolidayCalendar::new(),
        );

        // 1st is a Sunday.
        assert_eq!(lop.missing_days, 2);
        assert_eq!(lop.window_end, Some(d(31)));
    }

    #[test]
    fn test_window_ends_at_as_of() {
        let mut attendance = present_except(&[20]);
        attendance.push(day(d(20), AttendanceStatus::Absent));

        let lop = LopCalculator::calculate(
            &march(),
            Some(d(15)),
            d(31),
            &attendance,
            &[],
            &HolidayCalendar::new(),
        );

        assert_eq!(lop.window_end, Some(d(15)));
        assert_eq!(lop.total_half_days(), 0);
    }

    #[test]
    fn test_as_of_before_month_is_empty() {
        let as_of = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let lop = LopCalculator::calculate(
            &march(),
            Some(as_of),
            d(31),
            &[],
            &[],
            &HolidayCalendar::new(),
        );
        assert_eq!(lop, LopBreakdown::default());
    }
}
