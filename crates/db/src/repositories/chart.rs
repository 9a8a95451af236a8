//! Chart of accounts.

use std::collections::BTreeMap;

use payledger_core::ledger::{HeadCode, LedgerError};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::error::StoreResult;
use crate::entities::account_heads;

/// The fixed account heads, resolved against the store.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    heads: BTreeMap<HeadCode, account_heads::Model>,
}

impl ChartOfAccounts {
    /// Loads every fixed head.
    ///
    /// # Errors
    ///
    /// Returns `HeadNotFound` naming the first missing code, or a database
    /// error.
    pub async fn load<C: ConnectionTrait>(conn: &C) -> StoreResult<Self> {
        let codes: Vec<&str> = HeadCode::ALL.iter().map(|head| head.code()).collect();
        let rows = account_heads::Entity::find()
            .filter(account_heads::Column::Code.is_in(codes))
            .all(conn)
            .await?;

        let mut heads = BTreeMap::new();
        for row in rows {
            if let Some(code) = HeadCode::from_code(&row.code) {
                heads.insert(code, row);
            }
        }

        if let Some(missing) = HeadCode::ALL.iter().find(|code| !heads.contains_key(code)) {
            return Err(LedgerError::HeadNotFound(missing.code().to_string()).into());
        }

        Ok(Self { heads })
    }

    /// Returns a fixed head.
    ///
    /// # Errors
    ///
    /// Returns `HeadNotFound` if the head was not loaded.
    pub fn head(&self, code: HeadCode) -> Result<&account_heads::Model, LedgerError> {
        self.heads
            .get(&code)
            .ok_or_else(|| LedgerError::HeadNotFound(code.code().to_string()))
    }

    /// Returns the id of a fixed head.
    ///
    /// # Errors
    ///
    /// Returns `HeadNotFound` if the head was not loaded.
    pub fn head_id(&self, code: HeadCode) -> Result<Uuid, LedgerError> {
        self.head(code).map(|head| head.id)
    }
}

/// Lists every account head by code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_heads<C: ConnectionTrait>(conn: &C) -> StoreResult<Vec<account_heads::Model>> {
    Ok(account_heads::Entity::find()
        .order_by_asc(account_heads::Column::Code)
        .all(conn)
        .await?)
}
