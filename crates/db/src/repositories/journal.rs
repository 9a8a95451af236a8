//! Journal repository: posting, correcting, and reversing journal entries.
//!
//! Ledger balances are maintained with in-store increments
//! (`balance_minor = balance_minor + delta`) applied per ledger in ascending
//! id order, inside the same transaction that writes the lines.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, Utc};
use payledger_core::ledger::{
    EntityType, EntryNature, EntryType, JournalLineInput, JournalLines, LedgerError,
    LedgerService,
};
use payledger_shared::types::round_money;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::{StoreError, StoreResult};
use super::minor;
use super::sequence::SequenceAllocator;
use crate::entities::sea_orm_active_enums as stored;
use crate::entities::{clients, journal_entries, journal_lines, ledgers, staff};

/// Number of entries returned by [`JournalRepository::list_transactions`]
/// when no limit is given.
pub const DEFAULT_TRANSACTION_LIMIT: u64 = 20;

/// A journal entry to post.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// Entry date; also selects the transaction number's period.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Nominal amount; must equal the total debit.
    pub amount: Decimal,
    /// Entry type.
    pub entry_type: EntryType,
    /// External reference.
    pub reference: Option<String>,
    /// Advance side effect.
    pub nature: EntryNature,
    /// Client or staff member whose advance counter moves.
    pub entity_id: Option<Uuid>,
    /// Caller identity.
    pub created_by: String,
    /// Two-leg shorthand or explicit legs.
    pub lines: JournalLines,
}

/// Input for the two-leg transaction shorthand.
#[derive(Debug, Clone)]
pub struct RecordTransactionInput {
    /// Entry date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Amount moved.
    pub amount: Decimal,
    /// Entry type.
    pub entry_type: EntryType,
    /// Ledger credited.
    pub from_ledger_id: Uuid,
    /// Ledger debited.
    pub to_ledger_id: Uuid,
    /// External reference.
    pub reference: Option<String>,
    /// Advance side effect.
    pub nature: EntryNature,
    /// Client or staff member for advance natures.
    pub entity_id: Option<Uuid>,
    /// Caller identity.
    pub created_by: String,
}

impl From<RecordTransactionInput> for NewJournalEntry {
    fn from(input: RecordTransactionInput) -> Self {
        Self {
            date: input.date,
            description: input.description,
            amount: input.amount,
            entry_type: input.entry_type,
            reference: input.reference,
            nature: input.nature,
            entity_id: input.entity_id,
            created_by: input.created_by,
            lines: JournalLines::Pair {
                debit_ledger_id: input.to_ledger_id,
                credit_ledger_id: input.from_ledger_id,
            },
        }
    }
}

/// Changes to an existing entry.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New description.
    pub description: Option<String>,
    /// New date; the transaction number is kept.
    pub date: Option<NaiveDate>,
    /// New reference.
    pub reference: Option<String>,
    /// New amount; every leg is rescaled.
    pub amount: Option<Decimal>,
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Earliest entry date.
    pub date_from: Option<NaiveDate>,
    /// Latest entry date.
    pub date_to: Option<NaiveDate>,
    /// Only entries touching this ledger.
    pub ledger_id: Option<Uuid>,
    /// Maximum number of entries.
    pub limit: Option<u64>,
}

/// One journal line with its ledger's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineView {
    /// Line id.
    pub id: Uuid,
    /// Position within the entry.
    pub line_no: i32,
    /// Ledger id.
    pub ledger_id: Uuid,
    /// Ledger code.
    pub ledger_code: String,
    /// Ledger name.
    pub ledger_name: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl LineView {
    fn new(line: &journal_lines::Model, ledger: &ledgers::Model) -> Self {
        Self {
            id: line.id,
            line_no: line.line_no,
            ledger_id: ledger.id,
            ledger_code: ledger.ledger_code.clone(),
            ledger_name: ledger.name.clone(),
            debit: line.debit(),
            credit: line.credit(),
        }
    }

    /// `name (code)` of the line's ledger.
    #[must_use]
    pub fn ledger_label(&self) -> String {
        format!("{} ({})", self.ledger_name, self.ledger_code)
    }
}

/// A journal entry with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct EntryWithLines {
    /// The entry.
    pub entry: journal_entries::Model,
    /// Its lines in posting order.
    pub lines: Vec<LineView>,
}

/// Row of a transaction list.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionSummary {
    /// Entry id.
    pub id: Uuid,
    /// Transaction number.
    pub transaction_number: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Entry type.
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Amount.
    pub amount: Decimal,
    /// External reference.
    pub reference: Option<String>,
    /// Advance side effect.
    pub nature: EntryNature,
    /// Caller identity.
    pub created_by: String,
    /// Debited ledgers as `name (code)`.
    pub debit_ledgers: Vec<String>,
    /// Credited ledgers as `name (code)`.
    pub credit_ledgers: Vec<String>,
}

impl TransactionSummary {
    fn new(entry: journal_entries::Model, lines: &[LineView]) -> Self {
        let labels = |debit: bool| {
            lines
                .iter()
                .filter(|line| line.debit.is_zero() != debit)
                .map(LineView::ledger_label)
                .collect()
        };
        Self {
            id: entry.id,
            transaction_number: entry.transaction_number.clone(),
            date: entry.entry_date,
            description: entry.description.clone(),
            entry_type: entry.entry_type.into(),
            amount: entry.amount(),
            reference: entry.reference.clone(),
            nature: entry.nature.into(),
            created_by: entry.created_by,
            debit_ledgers: labels(true),
            credit_ledgers: labels(false),
        }
    }
}

/// Journal repository for posting and correcting entries.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    sequences: SequenceAllocator,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, sequences: SequenceAllocator) -> Self {
        Self { db, sequences }
    }

    /// Posts a two-leg transaction: debit `to`, credit `from`.
    ///
    /// An advance nature with an `entity_id` also increments the client's
    /// or staff member's advance counter.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive or `from` equals `to`
    /// - A ledger or the advance entity does not exist
    /// - Database operation fails
    pub async fn record_transaction(
        &self,
        input: RecordTransactionInput,
    ) -> StoreResult<EntryWithLines> {
        self.create_journal_entry(input.into()).await
    }

    /// Posts a journal entry with explicit legs or the two-leg shorthand.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed legs, `LedgerNotFound` for
    /// unknown ledgers, or a database error.
    pub async fn create_journal_entry(&self, input: NewJournalEntry) -> StoreResult<EntryWithLines> {
        let txn = self.db.begin().await?;
        let posted = post_in(&txn, &self.sequences, input).await?;
        txn.commit().await?;
        Ok(posted)
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or a database error.
    pub async fn get_transaction(&self, entry_id: Uuid) -> StoreResult<EntryWithLines> {
        let entry = find_entry(&self.db, entry_id).await?;
        let mut lines = load_line_views(&self.db, &[entry_id]).await?;
        Ok(EntryWithLines {
            lines: lines.remove(&entry_id).unwrap_or_default(),
            entry,
        })
    }

    /// Lists entries newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> StoreResult<Vec<TransactionSummary>> {
        let mut query = journal_entries::Entity::find();

        if let Some(from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }
        if let Some(ledger_id) = filter.ledger_id {
            query = query.filter(
                journal_entries::Column::Id.in_subquery(
                    Query::select()
                        .column(journal_lines::Column::EntryId)
                        .from(journal_lines::Entity)
                        .and_where(journal_lines::Column::LedgerId.eq(ledger_id))
                        .to_owned(),
                ),
            );
        }

        let entries = query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .order_by_desc(journal_entries::Column::TransactionNumber)
            .limit(filter.limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT))
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = entries.iter().map(|entry| entry.id).collect();
        let mut lines = load_line_views(&self.db, &ids).await?;

        Ok(entries
            .into_iter()
            .map(|entry| {
                let entry_lines = lines.remove(&entry.id).unwrap_or_default();
                TransactionSummary::new(entry, &entry_lines)
            })
            .collect())
    }

    /// Deletes an entry, reversing its lines and its advance counter.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntityNotFound` for a stored advance owner
    /// that no longer exists, or a database error.
    pub async fn delete_transaction(&self, entry_id: Uuid) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        let entry = find_entry(&txn, entry_id).await?;
        let lines = find_lines(&txn, entry_id).await?;
        let inputs: Vec<JournalLineInput> = lines.iter().map(journal_lines::Model::to_input).collect();

        apply_balance_changes(&txn, &LedgerService::reversal_changes(&inputs)).await?;
        move_entry_advance(&txn, &entry, &lines, -entry.amount_minor).await?;

        journal_lines::Entity::delete_many()
            .filter(journal_lines::Column::EntryId.eq(entry_id))
            .exec(&txn)
            .await?;
        journal_entries::Entity::delete_by_id(entry_id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            entry_id = %entry_id,
            transaction_number = %entry.transaction_number,
            amount = %entry.amount(),
            "Journal entry deleted"
        );
        Ok(())
    }

    /// Updates an entry's metadata and, optionally, its amount.
    ///
    /// Metadata never touches balances. An amount change rescales every leg
    /// by `new / old`, reverts the old legs, applies the new ones, and moves
    /// the advance counter by `new - old`.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, a validation error for a non-positive new
    /// amount or a zero old amount, or a database error.
    pub async fn update_transaction(
        &self,
        entry_id: Uuid,
        input: UpdateTransactionInput,
    ) -> StoreResult<EntryWithLines> {
        let txn = self.db.begin().await?;

        let entry = find_entry(&txn, entry_id).await?;
        let old_amount = entry.amount();
        let mut active: journal_entries::ActiveModel = entry.clone().into();

        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(date) = input.date {
            active.entry_date = Set(date);
        }
        if let Some(reference) = input.reference {
            active.reference = Set(Some(reference));
        }

        let new_amount = input.amount.map(round_money);
        if let Some(new_amount) = new_amount.filter(|amount| *amount != old_amount) {
            let lines = find_lines(&txn, entry_id).await?;
            let current: Vec<JournalLineInput> =
                lines.iter().map(journal_lines::Model::to_input).collect();
            let rescaled = LedgerService::rescale_lines(entry_id, &current, old_amount, new_amount)?;

            let mut changes = LedgerService::reversal_changes(&current);
            for (ledger_id, delta) in LedgerService::net_balance_changes(&rescaled) {
                *changes.entry(ledger_id).or_insert(Decimal::ZERO) += delta;
            }
            apply_balance_changes(&txn, &changes).await?;

            for (line, scaled) in lines.iter().zip(&rescaled) {
                let mut line: journal_lines::ActiveModel = line.clone().into();
                line.debit_minor = Set(minor(scaled.debit)?);
                line.credit_minor = Set(minor(scaled.credit)?);
                line.update(&txn).await?;
            }

            let new_minor = minor(new_amount)?;
            move_entry_advance(&txn, &entry, &lines, new_minor - entry.amount_minor).await?;
            active.amount_minor = Set(new_minor);

            info!(
                entry_id = %entry_id,
                old_amount = %old_amount,
                new_amount = %new_amount,
                "Journal entry rescaled"
            );
        }

        active.updated_at = Set(Utc::now().into());
        let entry = active.update(&txn).await?;
        let mut lines = load_line_views(&txn, &[entry_id]).await?;

        txn.commit().await?;

        Ok(EntryWithLines {
            lines: lines.remove(&entry_id).unwrap_or_default(),
            entry,
        })
    }
}

/// Posts a journal entry inside an open transaction.
///
/// Amounts are rounded to cents before validation. The transaction number's
/// period is the entry date's year and month.
pub(crate) async fn post_in(
    txn: &DatabaseTransaction,
    sequences: &SequenceAllocator,
    input: NewJournalEntry,
) -> StoreResult<EntryWithLines> {
    let amount = round_money(input.amount);
    let lines = match input.lines {
        JournalLines::Lines(lines) => JournalLines::Lines(
            lines
                .into_iter()
                .map(|line| JournalLineInput {
                    ledger_id: line.ledger_id,
                    debit: round_money(line.debit),
                    credit: round_money(line.credit),
                })
                .collect(),
        ),
        pair @ JournalLines::Pair { .. } => pair,
    };
    let (resolved, _totals) = LedgerService::resolve_lines(amount, &lines)?;

    let changes = LedgerService::net_balance_changes(&resolved);
    let ledger_ids: Vec<Uuid> = changes.keys().copied().collect();
    let found: HashMap<Uuid, ledgers::Model> = ledgers::Entity::find()
        .filter(ledgers::Column::Id.is_in(ledger_ids.clone()))
        .all(txn)
        .await?
        .into_iter()
        .map(|ledger| (ledger.id, ledger))
        .collect();
    if let Some(missing) = ledger_ids.into_iter().find(|id| !found.contains_key(id)) {
        return Err(LedgerError::LedgerNotFound(missing).into());
    }

    let transaction_number = sequences
        .next_transaction_number(txn, input.date.year(), input.date.month())
        .await?;
    let now = Utc::now().into();

    let entry = journal_entries::ActiveModel {
        id: Set(Uuid::new_v4()),
        transaction_number: Set(transaction_number.clone()),
        entry_date: Set(input.date),
        description: Set(input.description),
        amount_minor: Set(minor(amount)?),
        entry_type: Set(input.entry_type.into()),
        reference: Set(input.reference),
        nature: Set(input.nature.into()),
        entity_id: Set(input.entity_id),
        created_by: Set(input.created_by),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await
    .map_err(|err| StoreError::from_insert(err, &transaction_number))?;

    let mut views = Vec::with_capacity(resolved.len());
    for (index, line) in resolved.iter().enumerate() {
        let inserted = journal_lines::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_id: Set(entry.id),
            ledger_id: Set(line.ledger_id),
            line_no: Set(i32::try_from(index + 1).unwrap_or(i32::MAX)),
            debit_minor: Set(minor(line.debit)?),
            credit_minor: Set(minor(line.credit)?),
        }
        .insert(txn)
        .await?;

        if let Some(ledger) = found.get(&line.ledger_id) {
            views.push(LineView::new(&inserted, ledger));
        }
    }

    apply_balance_changes(txn, &changes).await?;

    if let (Some(owner), Some(entity_id)) = (advance_owner(entry.nature), entry.entity_id) {
        if !move_advance(txn, owner, entity_id, entry.amount_minor).await? {
            return Err(advance_owner_missing(owner, entity_id).into());
        }
    }

    info!(
        entry_id = %entry.id,
        transaction_number = %entry.transaction_number,
        amount = %amount,
        lines = views.len(),
        "Journal entry posted"
    );

    Ok(EntryWithLines {
        entry,
        lines: views,
    })
}

/// Applies stored-balance changes with in-store increments, in key order.
pub(crate) async fn apply_balance_changes(
    txn: &DatabaseTransaction,
    changes: &BTreeMap<Uuid, Decimal>,
) -> StoreResult<()> {
    for (&ledger_id, &delta) in changes {
        if delta.is_zero() {
            continue;
        }
        let result = ledgers::Entity::update_many()
            .col_expr(
                ledgers::Column::BalanceMinor,
                Expr::col(ledgers::Column::BalanceMinor).add(minor(delta)?),
            )
            .filter(ledgers::Column::Id.eq(ledger_id))
            .exec(txn)
            .await?;
        if result.rows_affected != 1 {
            return Err(LedgerError::LedgerNotFound(ledger_id).into());
        }
    }
    Ok(())
}

/// Adds `delta_minor` to an advance counter; returns false when the owner
/// does not exist.
async fn move_advance(
    txn: &DatabaseTransaction,
    owner: EntityType,
    entity_id: Uuid,
    delta_minor: i64,
) -> StoreResult<bool> {
    if delta_minor == 0 {
        return Ok(true);
    }
    let rows = match owner {
        EntityType::Client => {
            clients::Entity::update_many()
                .col_expr(
                    clients::Column::AdvanceBalanceMinor,
                    Expr::col(clients::Column::AdvanceBalanceMinor).add(delta_minor),
                )
                .filter(clients::Column::Id.eq(entity_id))
                .exec(txn)
                .await?
                .rows_affected
        }
        _ => {
            staff::Entity::update_many()
                .col_expr(
                    staff::Column::AdvanceBalanceMinor,
                    Expr::col(staff::Column::AdvanceBalanceMinor).add(delta_minor),
                )
                .filter(staff::Column::Id.eq(entity_id))
                .exec(txn)
                .await?
                .rows_affected
        }
    };
    Ok(rows == 1)
}

fn advance_owner_missing(owner: EntityType, entity_id: Uuid) -> LedgerError {
    LedgerError::EntityNotFound {
        entity_type: owner.to_string(),
        entity_id: entity_id.to_string(),
    }
}

/// Moves the advance counter behind an existing entry by `delta_minor`.
///
/// Entries carrying `entity_id` name their owner directly. Older entries
/// without it are resolved through the credit leg's ledger (advances
/// received) or the debit leg's ledger (advances paid).
async fn move_entry_advance(
    txn: &DatabaseTransaction,
    entry: &journal_entries::Model,
    lines: &[journal_lines::Model],
    delta_minor: i64,
) -> StoreResult<()> {
    let Some(owner) = advance_owner(entry.nature) else {
        return Ok(());
    };

    if let Some(entity_id) = entry.entity_id {
        if !move_advance(txn, owner, entity_id, delta_minor).await? {
            return Err(advance_owner_missing(owner, entity_id).into());
        }
        return Ok(());
    }

    // Legacy entries: best effort, a missing owner only logs.
    let Some(entity_id) = resolve_legacy_owner(txn, owner, lines).await? else {
        warn!(
            entry_id = %entry.id,
            nature = ?entry.nature,
            "Advance owner could not be resolved, counter left unchanged"
        );
        return Ok(());
    };
    if !move_advance(txn, owner, entity_id, delta_minor).await? {
        warn!(
            entry_id = %entry.id,
            entity_id = %entity_id,
            "Advance owner no longer exists, counter left unchanged"
        );
    }
    Ok(())
}

async fn resolve_legacy_owner(
    txn: &DatabaseTransaction,
    owner: EntityType,
    lines: &[journal_lines::Model],
) -> StoreResult<Option<Uuid>> {
    let received = owner == EntityType::Client;
    let Some(line) = lines
        .iter()
        .find(|line| if received { line.credit_minor > 0 } else { line.debit_minor > 0 })
    else {
        return Ok(None);
    };

    let Some(ledger) = ledgers::Entity::find_by_id(line.ledger_id).one(txn).await? else {
        return Ok(None);
    };
    let entity_type = EntityType::from(ledger.entity_type);
    let owned = if received {
        entity_type == EntityType::Client
    } else {
        matches!(entity_type, EntityType::Staff | EntityType::StaffAdvance)
    };
    if !owned {
        return Ok(None);
    }

    Ok(ledger
        .entity_id
        .as_deref()
        .and_then(|id| Uuid::parse_str(id).ok()))
}

async fn find_entry<C: ConnectionTrait>(
    conn: &C,
    entry_id: Uuid,
) -> StoreResult<journal_entries::Model> {
    journal_entries::Entity::find_by_id(entry_id)
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::EntryNotFound(entry_id).into())
}

async fn find_lines<C: ConnectionTrait>(
    conn: &C,
    entry_id: Uuid,
) -> StoreResult<Vec<journal_lines::Model>> {
    Ok(journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(entry_id))
        .order_by_asc(journal_lines::Column::LineNo)
        .all(conn)
        .await?)
}

/// Loads the lines of several entries, grouped by entry id.
async fn load_line_views<C: ConnectionTrait>(
    conn: &C,
    entry_ids: &[Uuid],
) -> StoreResult<HashMap<Uuid, Vec<LineView>>> {
    if entry_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.is_in(entry_ids.to_vec()))
        .find_also_related(ledgers::Entity)
        .order_by_asc(journal_lines::Column::LineNo)
        .all(conn)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<LineView>> = HashMap::new();
    for (line, ledger) in rows {
        if let Some(ledger) = ledger {
            grouped
                .entry(line.entry_id)
                .or_default()
                .push(LineView::new(&line, &ledger));
        }
    }
    Ok(grouped)
}

/// Kind of entity whose advance counter a stored nature moves.
fn advance_owner(nature: stored::EntryNature) -> Option<EntityType> {
    EntryNature::from(nature).advance_owner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn view(ledger: &str, debit: Decimal, credit: Decimal) -> LineView {
        LineView {
            id: Uuid::new_v4(),
            line_no: 1,
            ledger_id: Uuid::new_v4(),
            ledger_code: format!("LGR{ledger}"),
            ledger_name: ledger.to_string(),
            debit,
            credit,
        }
    }

    #[test]
    fn test_record_input_debits_to_and_credits_from() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let entry: NewJournalEntry = RecordTransactionInput {
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            description: "Rent".into(),
            amount: dec!(500),
            entry_type: EntryType::Expense,
            from_ledger_id: from,
            to_ledger_id: to,
            reference: None,
            nature: EntryNature::General,
            entity_id: None,
            created_by: "tester".into(),
        }
        .into();

        assert_eq!(
            entry.lines,
            JournalLines::Pair {
                debit_ledger_id: to,
                credit_ledger_id: from,
            }
        );
    }

    #[test]
    fn test_ledger_label() {
        let line = view("0001", dec!(10), Decimal::ZERO);
        assert_eq!(line.ledger_label(), "0001 (LGR0001)");
    }

    #[test]
    fn test_stored_nature_owner() {
        assert_eq!(advance_owner(stored::EntryNature::General), None);
        assert_eq!(
            advance_owner(stored::EntryNature::AdvanceReceived),
            Some(EntityType::Client)
        );
    }
}
