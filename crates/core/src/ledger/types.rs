//! Domain types for the chart of accounts and journal postings.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::balance::BalanceNature;

/// Accounting category of an account head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeadType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owner's stake.
    Equity,
    /// Earnings.
    Income,
    /// Costs.
    Expense,
}

impl HeadType {
    /// Returns which side increases a ledger of this type.
    #[must_use]
    pub const fn nature(self) -> BalanceNature {
        match self {
            Self::Asset | Self::Expense => BalanceNature::DebitNormal,
            Self::Liability | Self::Equity | Self::Income => BalanceNature::CreditNormal,
        }
    }

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for HeadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ASSET" => Ok(Self::Asset),
            "LIABILITY" => Ok(Self::Liability),
            "EQUITY" => Ok(Self::Equity),
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown head type: {s}")),
        }
    }
}

/// The fixed account heads the engine posts against.
///
/// Every code must exist in the chart of accounts before any posting runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadCode {
    /// `1000` Assets: cash, bank, receivables, salary advances.
    Assets,
    /// `2000` Liabilities: staff payables.
    Liabilities,
    /// `3000` Equity: opening balance adjustments.
    Equity,
    /// `4000` Income.
    Income,
    /// `6000` Expenses: salary expense.
    Expenses,
}

impl HeadCode {
    /// All fixed heads, in code order.
    pub const ALL: [Self; 5] = [
        Self::Assets,
        Self::Liabilities,
        Self::Equity,
        Self::Income,
        Self::Expenses,
    ];

    /// Returns the head's code in the chart of accounts.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Assets => "1000",
            Self::Liabilities => "2000",
            Self::Equity => "3000",
            Self::Income => "4000",
            Self::Expenses => "6000",
        }
    }

    /// Returns the display name used when seeding the head.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Liabilities => "Liabilities",
            Self::Equity => "Equity",
            Self::Income => "Income",
            Self::Expenses => "Expenses",
        }
    }

    /// Returns the accounting category of the head.
    #[must_use]
    pub const fn head_type(self) -> HeadType {
        match self {
            Self::Assets => HeadType::Asset,
            Self::Liabilities => HeadType::Liability,
            Self::Equity => HeadType::Equity,
            Self::Income => HeadType::Income,
            Self::Expenses => HeadType::Expense,
        }
    }

    /// Looks a head up by its code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|head| head.code() == code)
    }
}

impl fmt::Display for HeadCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Kind of business entity a ledger is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// A client; receivables and advances received.
    Client,
    /// A staff member's salary payable.
    Staff,
    /// A staff member's salary advance.
    StaffAdvance,
    /// A supplier.
    Vendor,
    /// A bank account.
    Bank,
    /// Cash in hand.
    Cash,
    /// A stand-alone income ledger.
    Income,
    /// A stand-alone expense ledger.
    Expense,
    /// System adjustment ledgers such as opening balances.
    Adjustment,
    /// Internal ledgers identified by a fixed key such as `SALARY_EXPENSE`.
    Internal,
}

impl EntityType {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Staff => "STAFF",
            Self::StaffAdvance => "STAFF_ADVANCE",
            Self::Vendor => "VENDOR",
            Self::Bank => "BANK",
            Self::Cash => "CASH",
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
            Self::Adjustment => "ADJUSTMENT",
            Self::Internal => "INTERNAL",
        }
    }

    /// Returns true for ledgers holding money (bank or cash).
    #[must_use]
    pub const fn is_cash_or_bank(self) -> bool {
        matches!(self, Self::Bank | Self::Cash)
    }

    /// Returns true when the ledger name comes from a client or staff record.
    #[must_use]
    pub const fn is_named_by_record(self) -> bool {
        matches!(self, Self::Client | Self::Staff | Self::StaffAdvance)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of economic event a journal entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    /// Money paid out.
    Payment,
    /// Money received.
    Receipt,
    /// Transfer between cash and bank.
    Contra,
    /// Expense booking.
    Expense,
    /// Income booking.
    Income,
    /// General journal.
    Journal,
}

/// Whether an entry moves an advance counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryNature {
    /// No side effect.
    #[default]
    General,
    /// Advance received from a client.
    AdvanceReceived,
    /// Advance paid to a staff member.
    AdvancePaid,
}

impl EntryNature {
    /// Returns the kind of entity whose advance counter moves with this entry.
    #[must_use]
    pub const fn advance_owner(self) -> Option<EntityType> {
        match self {
            Self::General => None,
            Self::AdvanceReceived => Some(EntityType::Client),
            Self::AdvancePaid => Some(EntityType::Staff),
        }
    }
}

/// One debit or credit leg of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// Ledger the leg posts to.
    pub ledger_id: Uuid,
    /// Debit amount (zero for a credit leg).
    pub debit: Decimal,
    /// Credit amount (zero for a debit leg).
    pub credit: Decimal,
}

impl JournalLineInput {
    /// Creates a debit leg.
    #[must_use]
    pub const fn debit(ledger_id: Uuid, amount: Decimal) -> Self {
        Self {
            ledger_id,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Creates a credit leg.
    #[must_use]
    pub const fn credit(ledger_id: Uuid, amount: Decimal) -> Self {
        Self {
            ledger_id,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    /// Returns true for a debit leg.
    #[must_use]
    pub fn is_debit(&self) -> bool {
        !self.debit.is_zero()
    }

    /// Change this leg applies to the stored (debit-positive) ledger balance.
    #[must_use]
    pub fn balance_delta(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// The legs of a new journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalLines {
    /// Two-leg shorthand: `amount` debited to one ledger and credited to another.
    Pair {
        /// Ledger receiving the debit.
        debit_ledger_id: Uuid,
        /// Ledger receiving the credit.
        credit_ledger_id: Uuid,
    },
    /// Explicit legs.
    Lines(Vec<JournalLineInput>),
}

/// Debit and credit totals of a set of legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingTotals {
    /// Sum of all debits.
    pub debit: Decimal,
    /// Sum of all credits.
    pub credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(HeadType::Asset, BalanceNature::DebitNormal)]
    #[case(HeadType::Expense, BalanceNature::DebitNormal)]
    #[case(HeadType::Liability, BalanceNature::CreditNormal)]
    #[case(HeadType::Equity, BalanceNature::CreditNormal)]
    #[case(HeadType::Income, BalanceNature::CreditNormal)]
    fn test_head_type_nature(#[case] head_type: HeadType, #[case] nature: BalanceNature) {
        assert_eq!(head_type.nature(), nature);
    }

    #[test]
    fn test_head_type_from_str() {
        assert_eq!("asset".parse::<HeadType>().unwrap(), HeadType::Asset);
        assert_eq!("INCOME".parse::<HeadType>().unwrap(), HeadType::Income);
        assert!("REVENUE".parse::<HeadType>().is_err());
    }

    #[test]
    fn test_head_codes() {
        assert_eq!(HeadCode::Assets.code(), "1000");
        assert_eq!(HeadCode::Liabilities.code(), "2000");
        assert_eq!(HeadCode::Expenses.code(), "6000");
        assert_eq!(HeadCode::from_code("3000"), Some(HeadCode::Equity));
        assert_eq!(HeadCode::from_code("5000"), None);
        for head in HeadCode::ALL {
            assert_eq!(HeadCode::from_code(head.code()), Some(head));
        }
    }

    #[test]
    fn test_advance_owner() {
        assert_eq!(EntryNature::General.advance_owner(), None);
        assert_eq!(
            EntryNature::AdvanceReceived.advance_owner(),
            Some(EntityType::Client)
        );
        assert_eq!(
            EntryNature::AdvancePaid.advance_owner(),
            Some(EntityType::Staff)
        );
    }

    #[test]
    fn test_entity_type_serialization() {
        assert_eq!(
            serde_json::to_string(&EntityType::StaffAdvance).unwrap(),
            "\"STAFF_ADVANCE\""
        );
        assert!(EntityType::Bank.is_cash_or_bank());
        assert!(!EntityType::Internal.is_cash_or_bank());
    }
}
