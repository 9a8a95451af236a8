//! Report repository: account statements, the financial overview, and
//! balance audits.

use chrono::NaiveDate;
use payledger_core::ledger::{HeadType, LedgerBalance, LedgerError};
use payledger_core::reports::{
    AccountStatement, FinancialOverview, OverviewLedger, ReportService, StatementLedger,
    StatementPosting,
};
use payledger_shared::types::from_minor_units;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::error::StoreResult;
use crate::entities::{account_heads, journal_entries, journal_lines, ledgers};

/// Stored balance of a ledger compared with its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceCheck {
    /// The ledger ID.
    pub ledger_id: Uuid,
    /// Cached debit-positive balance.
    pub stored_balance: Decimal,
    /// `Σdebit − Σcredit` over the ledger's lines.
    pub computed_balance: Decimal,
}

impl BalanceCheck {
    /// Returns true when the cache matches the lines.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.stored_balance == self.computed_balance
    }
}

/// Report repository for read-only projections.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates the statement of a ledger over `[start, end]`.
    ///
    /// The opening balance comes from every line dated before `start`,
    /// read with the head's natural sign. Lines within the range are
    /// ordered by entry date, then creation time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange`, `LedgerNotFound`, or a database error.
    pub async fn get_account_statement(
        &self,
        ledger_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<AccountStatement> {
        if start > end {
            return Err(LedgerError::InvalidDateRange { start, end }.into());
        }

        let (ledger, head) = ledgers::Entity::find_by_id(ledger_id)
            .find_also_related(account_heads::Entity)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::LedgerNotFound(ledger_id))?;
        let head = head.ok_or_else(|| LedgerError::HeadNotFound(ledger.head_id.to_string()))?;

        let earlier: Vec<(i64, i64)> = journal_lines::Entity::find()
            .select_only()
            .column(journal_lines::Column::DebitMinor)
            .column(journal_lines::Column::CreditMinor)
            .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntries.def())
            .filter(journal_lines::Column::LedgerId.eq(ledger_id))
            .filter(journal_entries::Column::EntryDate.lt(start))
            .into_tuple()
            .all(&self.db)
            .await?;
        let mut opening = LedgerBalance::new(ledger_id);
        for (debit, credit) in earlier {
            opening.add_line(from_minor_units(debit), from_minor_units(credit));
        }

        let rows = journal_lines::Entity::find()
            .find_also_related(journal_entries::Entity)
            .filter(journal_lines::Column::LedgerId.eq(ledger_id))
            .filter(journal_entries::Column::EntryDate.gte(start))
            .filter(journal_entries::Column::EntryDate.lte(end))
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::CreatedAt)
            .order_by_asc(journal_entries::Column::TransactionNumber)
            .order_by_asc(journal_lines::Column::LineNo)
            .all(&self.db)
            .await?;

        let postings = rows
            .into_iter()
            .filter_map(|(line, entry)| {
                entry.map(|entry| StatementPosting {
                    entry_id: entry.id,
                    transaction_number: entry.transaction_number,
                    date: entry.entry_date,
                    description: entry.description,
                    entry_type: entry.entry_type.into(),
                    reference: entry.reference,
                    debit: line.debit(),
                    credit: line.credit(),
                })
            })
            .collect();

        let statement = ReportService::account_statement(
            StatementLedger {
                ledger_id,
                ledger_code: ledger.ledger_code,
                name: ledger.name,
                head_type: head.head_type.into(),
            },
            start,
            end,
            &opening,
            postings,
        )?;
        Ok(statement)
    }

    /// Aggregates income, expense, and the cash/bank position over all
    /// ledgers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_financial_overview(&self) -> StoreResult<FinancialOverview> {
        let rows = ledgers::Entity::find()
            .find_also_related(account_heads::Entity)
            .all(&self.db)
            .await?;

        let overview: Vec<OverviewLedger> = rows
            .into_iter()
            .filter_map(|(ledger, head)| {
                head.map(|head| OverviewLedger {
                    balance: ledger.balance(),
                    name: ledger.name,
                    head_type: HeadType::from(head.head_type),
                    entity_type: ledger.entity_type.into(),
                })
            })
            .collect();

        Ok(ReportService::financial_overview(&overview))
    }

    /// Recomputes a ledger's balance from its lines and compares it with the
    /// cached value.
    ///
    /// # Errors
    ///
    /// Returns `LedgerNotFound` or a database error.
    pub async fn verify_ledger_balance(&self, ledger_id: Uuid) -> StoreResult<BalanceCheck> {
        let ledger = ledgers::Entity::find_by_id(ledger_id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::LedgerNotFound(ledger_id))?;

        let lines: Vec<(i64, i64)> = journal_lines::Entity::find()
            .select_only()
            .column(journal_lines::Column::DebitMinor)
            .column(journal_lines::Column::CreditMinor)
            .filter(journal_lines::Column::LedgerId.eq(ledger_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut totals = LedgerBalance::new(ledger_id);
        for (debit, credit) in lines {
            totals.add_line(from_minor_units(debit), from_minor_units(credit));
        }

        let check = BalanceCheck {
            ledger_id,
            stored_balance: ledger.balance(),
            computed_balance: totals.stored_balance(),
        };
        if !check.is_consistent() {
            warn!(
                ledger_id = %ledger_id,
                stored = %check.stored_balance,
                computed = %check.computed_balance,
                "Ledger balance drifted from its lines"
            );
        }
        Ok(check)
    }
}
