//! Payroll domain types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Attendance status recorded for one staff member on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// Present.
    Present,
    /// Absent.
    Absent,
    /// Present for half a day.
    HalfDay,
    /// On leave.
    Leave,
    /// Attendance corrected after the fact.
    Regularized,
    /// Late arrival.
    Late,
}

/// One attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    /// Calendar day.
    pub date: NaiveDate,
    /// Recorded status.
    pub status: AttendanceStatus,
}

/// An approved leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSpan {
    /// First day on leave.
    pub start_date: NaiveDate,
    /// Last day on leave (inclusive).
    pub end_date: NaiveDate,
    /// Whether the leave is unpaid.
    pub loss_of_pay: bool,
}

impl LeaveSpan {
    /// Returns true when `date` falls inside the leave.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Number of leave days inside `[start, end]`.
    #[must_use]
    pub fn days_within(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        let from = self.start_date.max(start);
        let to = self.end_date.min(end);
        if from > to {
            return 0;
        }
        u32::try_from((to - from).num_days() + 1).unwrap_or(0)
    }
}

/// Returns true for leave types that are deducted as loss of pay.
#[must_use]
pub fn is_loss_of_pay_leave(leave_type: &str) -> bool {
    leave_type.eq_ignore_ascii_case("UNPAID") || leave_type.eq_ignore_ascii_case("LOP")
}

/// How much of the month a draft covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollType {
    /// The full month.
    #[default]
    Monthly,
    /// The days elapsed up to the calculation date.
    TillDate,
}

impl PayrollType {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::TillDate => "TILL_DATE",
        }
    }
}

impl fmt::Display for PayrollType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayrollType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MONTHLY" => Ok(Self::Monthly),
            "TILL_DATE" => Ok(Self::TillDate),
            _ => Err(format!("Unknown payroll type: {s}")),
        }
    }
}

/// Lifecycle of a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    /// Slips may still be saved.
    Draft,
    /// Confirmed and posted.
    Paid,
}

/// Lifecycle of a persisted payroll slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlipStatus {
    /// Saved, not yet posted.
    Pending,
    /// Posted to the ledger.
    Paid,
}

/// Fixed monthly salary components of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// Basic salary.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Conveyance allowance.
    pub conveyance: Decimal,
    /// Accommodation allowance.
    pub accommodation: Decimal,
    /// Other fixed allowances.
    pub allowances: Decimal,
}

impl SalaryStructure {
    /// Sum of all fixed components.
    #[must_use]
    pub fn monthly_fixed(&self) -> Decimal {
        self.basic + self.hra + self.conveyance + self.accommodation + self.allowances
    }

    /// Returns the name of the first negative component, if any.
    #[must_use]
    pub fn negative_component(&self) -> Option<&'static str> {
        [
            ("basic", self.basic),
            ("hra", self.hra),
            ("conveyance", self.conveyance),
            ("accommodation", self.accommodation),
            ("allowances", self.allowances),
        ]
        .into_iter()
        .find(|(_, value)| value.is_sign_negative() && !value.is_zero())
        .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    #[test]
    fn test_leave_days_within_window() {
        let leave = LeaveSpan {
            start_date: date(2, 26),
            end_date: date(3, 3),
            loss_of_pay: true,
        };
        assert_eq!(leave.days_within(date(3, 1), date(3, 31)), 3);
        assert_eq!(leave.days_within(date(3, 1), date(3, 2)), 2);
        assert_eq!(leave.days_within(date(3, 10), date(3, 31)), 0);
        assert!(leave.covers(date(2, 28)));
        assert!(!leave.covers(date(3, 4)));
    }

    #[rstest]
    #[case("UNPAID", true)]
    #[case("lop", true)]
    #[case("SICK", false)]
    #[case("CASUAL", false)]
    fn test_loss_of_pay_leave_types(#[case] leave_type: &str, #[case] expected: bool) {
        assert_eq!(is_loss_of_pay_leave(leave_type), expected);
    }

    #[test]
    fn test_monthly_fixed() {
        let structure = SalaryStructure {
            basic: dec!(9000),
            hra: dec!(3000),
            conveyance: dec!(800),
            accommodation: dec!(0),
            allowances: dec!(200),
        };
        assert_eq!(structure.monthly_fixed(), dec!(13000));
        assert_eq!(structure.negative_component(), None);

        let broken = SalaryStructure {
            hra: dec!(-1),
            ..structure
        };
        assert_eq!(broken.negative_component(), Some("hra"));
    }

    #[test]
    fn test_payroll_type_round_trip() {
        assert_eq!("till_date".parse::<PayrollType>().unwrap(), PayrollType::TillDate);
        assert_eq!(PayrollType::Monthly.to_string(), "MONTHLY");
        assert!("WEEKLY".parse::<PayrollType>().is_err());
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"HALF_DAY\""
        );
    }
}
