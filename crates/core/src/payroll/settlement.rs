//! Posting plans for payroll settlement.
//!
//! A plan is the amount and legs of one journal entry; storage validates
//! and posts it like any other entry.
//!
//! Accrual: Dr Salary Expense (net + advance), Cr staff payable (net),
//! Cr each ledger holding the advance (its share).
//! Payment: Dr staff payable, Cr bank (net).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::PayrollError;
use crate::ledger::JournalLineInput;

/// Part of an advance held on one ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceShare {
    /// Ledger holding the share.
    pub ledger_id: Uuid,
    /// Share of the advance.
    pub amount: Decimal,
}

/// What one slip owes and where it is credited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlipObligation {
    /// Staff member the slip belongs to.
    pub staff_id: Uuid,
    /// The staff member's payable ledger.
    pub staff_ledger_id: Uuid,
    /// Ledgers the recovered advance is credited to; shares add up to
    /// `advance_salary`.
    pub advance_credits: Vec<AdvanceShare>,
    /// Take-home pay.
    pub net_pay: Decimal,
    /// Advance recovered by this slip.
    pub advance_salary: Decimal,
}

impl SlipObligation {
    /// Net pay plus advance recovered.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.net_pay + self.advance_salary
    }

    fn credited_advance(&self) -> Decimal {
        self.advance_credits.iter().map(|share| share.amount).sum()
    }
}

/// Amount and legs of one journal entry to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingPlan {
    /// Entry amount; equals the total debit.
    pub amount: Decimal,
    /// Entry legs.
    pub lines: Vec<JournalLineInput>,
}

/// Builds settlement postings.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Splits a recovered advance across the ledgers holding it.
    ///
    /// Sources are drawn in order, each up to its own balance. Returns the
    /// shares and the part no source covers.
    #[must_use]
    pub fn allocate_advance(
        recovered: Decimal,
        sources: &[AdvanceShare],
    ) -> (Vec<AdvanceShare>, Decimal) {
        let mut remaining = recovered.max(Decimal::ZERO);
        let mut shares = Vec::with_capacity(sources.len());
        for source in sources {
            if remaining <= Decimal::ZERO {
                break;
            }
            let amount = source.amount.min(remaining);
            if amount > Decimal::ZERO {
                shares.push(AdvanceShare {
                    ledger_id: source.ledger_id,
                    amount,
                });
                remaining -= amount;
            }
        }
        (shares, remaining)
    }

    /// Plans the single accrual entry of a whole payroll run.
    ///
    /// Zero legs are left out. Returns `None` when every slip is zero.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceLedgerMissing` for a slip whose advance credits do
    /// not add up to its advance.
    pub fn batch_accrual(
        expense_ledger_id: Uuid,
        slips: &[SlipObligation],
    ) -> Result<Option<PostingPlan>, PayrollError> {
        let mut credits = Vec::with_capacity(slips.len() * 2);
        let mut amount = Decimal::ZERO;

        for slip in slips {
            if slip.net_pay > Decimal::ZERO {
                credits.push(JournalLineInput::credit(slip.staff_ledger_id, slip.net_pay));
            }
            if slip.credited_advance() != slip.advance_salary.max(Decimal::ZERO) {
                return Err(PayrollError::AdvanceLedgerMissing(slip.staff_id));
            }
            credits.extend(
                slip.advance_credits
                    .iter()
                    .filter(|share| share.amount > Decimal::ZERO)
                    .map(|share| JournalLineInput::credit(share.ledger_id, share.amount)),
            );
            amount += slip.total();
        }

        if credits.is_empty() {
            return Ok(None);
        }

        let mut lines = Vec::with_capacity(credits.len() + 1);
        lines.push(JournalLineInput::debit(expense_ledger_id, amount));
        lines.extend(credits);
        Ok(Some(PostingPlan { amount, lines }))
    }

    /// Plans the accrual entry of one slip.
    ///
    /// # Errors
    ///
    /// Returns `AdvanceLedgerMissing` as [`Self::batch_accrual`] does.
    pub fn accrual(
        expense_ledger_id: Uuid,
        slip: &SlipObligation,
    ) -> Result<Option<PostingPlan>, PayrollError> {
        Self::batch_accrual(expense_ledger_id, std::slice::from_ref(slip))
    }

    /// Plans the payment of a slip's net pay from the bank.
    ///
    /// Returns `None` when there is nothing to pay.
    #[must_use]
    pub fn payment(
        staff_ledger_id: Uuid,
        bank_ledger_id: Uuid,
        net_pay: Decimal,
    ) -> Option<PostingPlan> {
        (net_pay > Decimal::ZERO).then(|| PostingPlan {
            amount: net_pay,
            lines: vec![
                JournalLineInput::debit(staff_ledger_id, net_pay),
                JournalLineInput::credit(bank_ledger_id, net_pay),
            ],
        })
    }
}
