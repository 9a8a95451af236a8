//! Report service for generating statements and the financial overview.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{
    AccountStatement, ExpenseSlice, FinancialOverview, OverviewLedger, StatementLedger,
    StatementLine, StatementPosting,
};
use crate::ledger::{HeadType, LedgerBalance, LedgerError, RunningBalance};

/// Report service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Builds an account statement.
    ///
    /// `opening` holds the totals of every line dated before `period_start`;
    /// `postings` holds the lines dated within the range. Postings are
    /// walked by date, keeping the given order within a day.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `period_start` is after `period_end`.
    pub fn account_statement(
        ledger: StatementLedger,
        period_start: NaiveDate,
        period_end: NaiveDate,
        opening: &LedgerBalance,
        mut postings: Vec<StatementPosting>,
    ) -> Result<AccountStatement, LedgerError> {
        if period_start > period_end {
            return Err(LedgerError::InvalidDateRange {
                start: period_start,
                end: period_end,
            });
        }

        let nature = ledger.head_type.nature();
        let opening_balance = opening.natural_balance(nature);

        postings.sort_by_key(|p| p.date);

        let mut running = RunningBalance::opening(opening_balance);
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let mut lines = Vec::with_capacity(postings.len());

        for posting in postings {
            running = running.next(nature.natural_change(posting.debit, posting.credit));
            total_debit += posting.debit;
            total_credit += posting.credit;
            lines.push(StatementLine {
                entry_id: posting.entry_id,
                transaction_number: posting.transaction_number,
                date: posting.date,
                description: posting.description,
                entry_type: posting.entry_type,
                reference: posting.reference,
                debit: posting.debit,
                credit: posting.credit,
                balance: running.current_balance,
            });
        }

        Ok(AccountStatement {
            ledger,
            period_start,
            period_end,
            opening_balance,
            total_debit,
            total_credit,
            closing_balance: running.current_balance,
            lines,
        })
    }

    /// Aggregates income, expense, and cash/bank balances across ledgers.
    ///
    /// - income: Σ|balance| of income-head ledgers
    /// - expense: Σ balance of expense-head ledgers; positive ones feed the breakdown
    /// - cash/bank: Σ balance of the remaining ledgers bound to a bank or cash entity
    #[must_use]
    pub fn financial_overview(ledgers: &[OverviewLedger]) -> FinancialOverview {
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        let mut cash_bank_balance = Decimal::ZERO;
        let mut breakdown: BTreeMap<&str, Decimal> = BTreeMap::new();

        for ledger in ledgers {
            match ledger.head_type {
                HeadType::Income => income += ledger.balance.abs(),
                HeadType::Expense => {
                    expense += ledger.balance;
                    if ledger.balance > Decimal::ZERO {
                        *breakdown.entry(ledger.name.as_str()).or_insert(Decimal::ZERO) +=
                            ledger.balance;
                    }
                }
                _ if ledger.entity_type.is_cash_or_bank() => {
                    cash_bank_balance += ledger.balance;
                }
                _ => {}
            }
        }

        FinancialOverview {
            income,
            expense,
            net_profit: income - expense,
            cash_bank_balance,
            expense_breakdown: breakdown
                .into_iter()
                .map(|(name, value)| ExpenseSlice {
                    name: name.to_string(),
                    value,
                })
                .collect(),
        }
    }
}
