//! Ledger code and transaction number allocation.
//!
//! Both allocators run on the caller's connection, normally the open
//! transaction of the record being numbered, so a rollback also drops the
//! number.

use payledger_core::ledger::LedgerError;
use payledger_core::ledger::sequence::{format_transaction_number, next_ledger_code};
use payledger_shared::config::LedgerConfig;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use tracing::debug;

use super::error::StoreResult;
use crate::entities::{ledgers, transaction_sequences};

/// Issues ledger codes and per-month transaction numbers.
#[derive(Debug, Clone)]
pub struct SequenceAllocator {
    ledger_code_prefix: String,
    transaction_number_prefix: String,
}

impl SequenceAllocator {
    /// Creates an allocator with the configured prefixes.
    #[must_use]
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            ledger_code_prefix: config.ledger_code_prefix.clone(),
            transaction_number_prefix: config.transaction_number_prefix.clone(),
        }
    }

    /// Returns the code after the numerically highest existing one.
    ///
    /// Two concurrent callers can compute the same code; the unique index
    /// on `ledger_code` rejects the second insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn next_ledger_code<C: ConnectionTrait>(&self, conn: &C) -> StoreResult<String> {
        let codes: Vec<String> = ledgers::Entity::find()
            .select_only()
            .column(ledgers::Column::LedgerCode)
            .filter(ledgers::Column::LedgerCode.starts_with(&self.ledger_code_prefix))
            .into_tuple()
            .all(conn)
            .await?;

        let code = next_ledger_code(&self.ledger_code_prefix, codes.iter().map(String::as_str));
        debug!(ledger_code = %code, "Allocated ledger code");
        Ok(code)
    }

    /// Increments the counter of `year`/`month` and formats the result.
    ///
    /// A single upsert bumps and returns the counter, so concurrent
    /// postings in the same month never share a number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` for a bad month, or a database error.
    pub async fn next_transaction_number<C: ConnectionTrait>(
        &self,
        conn: &C,
        year: i32,
        month: u32,
    ) -> StoreResult<String> {
        let month_col = i32::try_from(month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or(LedgerError::InvalidPeriod { year, month })?;

        let mut insert = Query::insert();
        insert
            .into_table(transaction_sequences::Entity)
            .columns([
                transaction_sequences::Column::Year,
                transaction_sequences::Column::Month,
                transaction_sequences::Column::LastSeq,
            ])
            .values([year.into(), month_col.into(), 1_i64.into()])
            .map_err(|e| DbErr::Custom(e.to_string()))?;
        insert
            .on_conflict(
                OnConflict::columns([
                    transaction_sequences::Column::Year,
                    transaction_sequences::Column::Month,
                ])
                .value(
                    transaction_sequences::Column::LastSeq,
                    Expr::col((
                        transaction_sequences::Entity,
                        transaction_sequences::Column::LastSeq,
                    ))
                    .add(1),
                )
                .to_owned(),
            )
            .returning_col(transaction_sequences::Column::LastSeq);

        let row = conn
            .query_one(conn.get_database_backend().build(&insert))
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("transaction sequence".to_string()))?;
        let last_seq: i64 = row.try_get("", "last_seq")?;
        let sequence = u64::try_from(last_seq)
            .map_err(|_| DbErr::Custom(format!("negative transaction sequence {last_seq}")))?;

        let number =
            format_transaction_number(&self.transaction_number_prefix, year, month, sequence)?;
        debug!(year, month, transaction_number = %number, "Allocated transaction number");
        Ok(number)
    }
}
