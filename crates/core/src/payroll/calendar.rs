//! Pay periods and holidays.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use super::error::PayrollError;

/// A calendar month payroll is settled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayPeriod {
    year: i32,
    month: u32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl PayPeriod {
    /// Creates the period for `month`/`year`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` for a month outside 1..=12 or an
    /// unrepresentable year.
    pub fn new(year: i32, month: u32) -> Result<Self, PayrollError> {
        let invalid = || PayrollError::InvalidPeriod { year, month };
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = next_month
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;
        Ok(Self {
            year,
            month,
            first_day,
            last_day,
        })
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1..=12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last day of the month.
    #[must_use]
    pub const fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Returns true when `date` falls in this month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    /// Moves `date` into the month.
    #[must_use]
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.first_day, self.last_day)
    }

    /// Short label such as `Mar 2026`.
    #[must_use]
    pub fn label(&self) -> String {
        self.first_day.format("%b %Y").to_string()
    }
}

/// Company holidays, either on a fixed date or every year on the same day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    fixed: BTreeSet<NaiveDate>,
    recurring: BTreeSet<(u32, u32)>,
}

impl HolidayCalendar {
    /// Creates an empty calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a holiday.
    pub fn add(&mut self, date: NaiveDate, recurring: bool) {
        if recurring {
            self.recurring.insert((date.month(), date.day()));
        } else {
            self.fixed.insert(date);
        }
    }

    /// Returns true when `date` is a holiday.
    #[must_use]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.fixed.contains(&date) || self.recurring.contains(&(date.month(), date.day()))
    }
}

impl FromIterator<(NaiveDate, bool)> for HolidayCalendar {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, bool)>>(iter: I) -> Self {
        let mut calendar = Self::new();
        for (date, recurring) in iter {
            calendar.add(date, recurring);
        }
        calendar
    }
}
