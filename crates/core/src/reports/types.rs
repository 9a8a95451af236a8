//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::{EntityType, EntryType, HeadType};

/// Ledger a statement is drawn for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLedger {
    /// Ledger ID.
    pub ledger_id: Uuid,
    /// Ledger code.
    pub ledger_code: String,
    /// Ledger name.
    pub name: String,
    /// Type of the owning head.
    pub head_type: HeadType,
}

/// One journal line as read from storage, with its entry's details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementPosting {
    /// Journal entry ID.
    pub entry_id: Uuid,
    /// Entry transaction number.
    pub transaction_number: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Entry type.
    pub entry_type: EntryType,
    /// Entry reference.
    pub reference: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Statement line with its running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementLine {
    /// Journal entry ID.
    pub entry_id: Uuid,
    /// Entry transaction number.
    pub transaction_number: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Entry type.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Entry reference.
    pub reference: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this line, read with the head's sign.
    pub balance: Decimal,
}

/// Account statement over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    /// Ledger the statement is for.
    pub ledger: StatementLedger,
    /// First day of the range (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the range (inclusive).
    pub period_end: NaiveDate,
    /// Balance from all lines before `period_start`.
    pub opening_balance: Decimal,
    /// Total debits in the range.
    pub total_debit: Decimal,
    /// Total credits in the range.
    pub total_credit: Decimal,
    /// Balance after the last line in the range.
    pub closing_balance: Decimal,
    /// Lines in date order.
    pub lines: Vec<StatementLine>,
}

/// A ledger as seen by the financial overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewLedger {
    /// Ledger name.
    pub name: String,
    /// Type of the owning head.
    pub head_type: HeadType,
    /// Entity type of the ledger.
    pub entity_type: EntityType,
    /// Stored (debit-positive) balance.
    pub balance: Decimal,
}

/// One slice of the expense breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSlice {
    /// Ledger name.
    pub name: String,
    /// Expense total for that name.
    pub value: Decimal,
}

/// Aggregate income, expense, and cash position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialOverview {
    /// Sum of absolute income balances.
    pub income: Decimal,
    /// Sum of expense balances.
    pub expense: Decimal,
    /// `income - expense`.
    pub net_profit: Decimal,
    /// Sum of bank and cash balances.
    pub cash_bank_balance: Decimal,
    /// Positive expense balances by ledger name, for pie charts.
    pub expense_breakdown: Vec<ExpenseSlice>,
}
