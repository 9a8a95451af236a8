//! Account statements, the financial overview, and balance verification.

#![allow(clippy::unwrap_used)]

mod common;

use payledger_core::ledger::{EntityType, HeadCode, LedgerError};
use payledger_db::StoreError;
use payledger_db::entities::ledgers;
use payledger_shared::ErrorKind;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use common::{TestContext, date};

struct Books {
    bank: ledgers::Model,
    sales: ledgers::Model,
    rent: ledgers::Model,
}

async fn books(ctx: &TestContext) -> Books {
    let bank = ctx.bank().await;
    let sales = ctx.ledger("Sales", HeadCode::Income, EntityType::Income).await;
    let rent = ctx.ledger("Rent", HeadCode::Expenses, EntityType::Expense).await;

    ctx.transfer(sales.id, bank.id, dec!(1000), date(2026, 2, 10)).await;
    ctx.transfer(bank.id, rent.id, dec!(200), date(2026, 3, 5)).await;
    ctx.transfer(sales.id, bank.id, dec!(300), date(2026, 3, 20)).await;
    ctx.transfer(bank.id, rent.id, dec!(50), date(2026, 4, 2)).await;

    Books { bank, sales, rent }
}

#[tokio::test]
async fn test_statement_of_asset_ledger() {
    let ctx = common::setup().await;
    let books = books(&ctx).await;

    let statement = ctx
        .reports
        .get_account_statement(books.bank.id, date(2026, 3, 1), date(2026, 3, 31))
        .await
        .unwrap();

    assert_eq!(statement.ledger.name, "Main Bank Account");
    assert_eq!(statement.opening_balance, dec!(1000));
    assert_eq!(statement.lines.len(), 2);
    assert_eq!(statement.lines[0].date, date(2026, 3, 5));
    assert_eq!(statement.lines[0].credit, dec!(200));
    assert_eq!(statement.lines[0].balance, dec!(800));
    assert_eq!(statement.lines[1].debit, dec!(300));
    assert_eq!(statement.lines[1].balance, dec!(1100));
    assert_eq!(statement.total_debit, dec!(300));
    assert_eq!(statement.total_credit, dec!(200));
    assert_eq!(statement.closing_balance, dec!(1100));
}

#[tokio::test]
async fn test_statement_of_income_ledger_reads_credit_positive() {
    let ctx = common::setup().await;
    let books = books(&ctx).await;

    let statement = ctx
        .reports
        .get_account_statement(books.sales.id, date(2026, 3, 1), date(2026, 3, 31))
        .await
        .unwrap();

    assert_eq!(statement.opening_balance, dec!(1000));
    assert_eq!(statement.lines.len(), 1);
    assert_eq!(statement.closing_balance, dec!(1300));
}

#[tokio::test]
async fn test_statement_with_no_activity() {
    let ctx = common::setup().await;
    let books = books(&ctx).await;

    let statement = ctx
        .reports
        .get_account_statement(books.rent.id, date(2026, 1, 1), date(2026, 1, 31))
        .await
        .unwrap();

    assert_eq!(statement.opening_balance, Decimal::ZERO);
    assert!(statement.lines.is_empty());
    assert_eq!(statement.closing_balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_statement_rejects_inverted_range() {
    let ctx = common::setup().await;
    let bank = ctx.bank().await;

    let err = ctx
        .reports
        .get_account_statement(bank.id, date(2026, 3, 31), date(2026, 3, 1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Ledger(LedgerError::InvalidDateRange { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = ctx
        .reports
        .get_account_statement(Uuid::new_v4(), date(2026, 3, 1), date(2026, 3, 31))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Ledger(LedgerError::LedgerNotFound(_))));
}

#[tokio::test]
async fn test_financial_overview() {
    let ctx = common::setup().await;
    books(&ctx).await;

    let overview = ctx.reports.get_financial_overview().await.unwrap();

    assert_eq!(overview.income, dec!(1300));
    assert_eq!(overview.expense, dec!(250));
    assert_eq!(overview.net_profit, dec!(1050));
    assert_eq!(overview.cash_bank_balance, dec!(1050));
    assert_eq!(overview.expense_breakdown.len(), 1);
    assert_eq!(overview.expense_breakdown[0].name, "Rent");
    assert_eq!(overview.expense_breakdown[0].value, dec!(250));
}

#[tokio::test]
async fn test_verify_ledger_balance_detects_drift() {
    let ctx = common::setup().await;
    let books = books(&ctx).await;

    let check = ctx.reports.verify_ledger_balance(books.bank.id).await.unwrap();
    assert!(check.is_consistent());
    assert_eq!(check.computed_balance, dec!(1050));

    let bank = ctx.bank().await;
    let mut tampered: ledgers::ActiveModel = bank.into();
    tampered.balance_minor = Set(1);
    tampered.update(&ctx.db).await.unwrap();

    let check = ctx.reports.verify_ledger_balance(books.bank.id).await.unwrap();
    assert!(!check.is_consistent());
    assert_eq!(check.stored_balance, dec!(0.01));
    assert_eq!(check.computed_balance, dec!(1050));
}
