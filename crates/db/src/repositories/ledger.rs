//! Ledger repository: chart-of-accounts maintenance and auto-provisioning.

use chrono::{NaiveDate, Utc};
use payledger_core::ledger::{
    BalanceNature, EntityType, EntryNature, EntryType, HeadCode, HeadType, JournalLines,
    LedgerError,
};
use payledger_shared::types::round_money;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::chart::{self, ChartOfAccounts};
use super::error::{StoreError, StoreResult};
use super::journal::{NewJournalEntry, post_in};
use super::sequence::SequenceAllocator;
use crate::entities::sea_orm_active_enums::{self as stored, LedgerStatus};
use crate::entities::{account_heads, clients, journal_lines, ledgers, staff};

/// Name of the system ledger opening balances are posted against.
pub const OPENING_BALANCE_LEDGER: &str = "Opening Balance Adjustment";

/// Reference of opening balance entries.
pub const OPENING_BALANCE_REFERENCE: &str = "OPENING_BAL";

/// Reference of manual balance corrections.
pub const MANUAL_EDIT_REFERENCE: &str = "MANUAL_EDIT";

/// Caller recorded on entries the system posts by itself.
pub const SYSTEM_USER: &str = "SYSTEM";

/// Input for creating a ledger.
#[derive(Debug, Clone)]
pub struct CreateLedgerInput {
    /// Ledger name.
    pub name: String,
    /// Owning account head.
    pub head_id: Uuid,
    /// Entity the ledger is bound to.
    pub entity_type: EntityType,
    /// Identifier of the bound entity.
    pub entity_id: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Natural opening balance; posted against the adjustment ledger.
    pub opening_balance: Option<Decimal>,
    /// Date of the opening balance entry (today when omitted).
    pub opening_balance_date: Option<NaiveDate>,
    /// Caller identity.
    pub created_by: String,
}

/// Metadata changes for a ledger.
#[derive(Debug, Clone, Default)]
pub struct UpdateLedgerInput {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<LedgerStatus>,
}

/// Filter options for listing ledgers.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    /// Filter by head.
    pub head_id: Option<Uuid>,
    /// Filter by entity type.
    pub entity_type: Option<EntityType>,
    /// Filter by status.
    pub status: Option<LedgerStatus>,
}

/// Ledger with its account head.
#[derive(Debug, Clone)]
pub struct LedgerWithHead {
    /// The ledger.
    pub ledger: ledgers::Model,
    /// Its head.
    pub head: account_heads::Model,
}

impl LedgerWithHead {
    /// Head category as a domain type.
    #[must_use]
    pub fn head_type(&self) -> HeadType {
        self.head.head_type.into()
    }

    /// Balance read with the head's sign.
    #[must_use]
    pub fn natural_balance(&self) -> Decimal {
        self.head_type().nature().natural_balance(self.ledger.balance())
    }
}

/// Request to materialize the ledger of an entity.
#[derive(Debug, Clone)]
pub struct EnsureLedger {
    /// Entity type.
    pub entity_type: EntityType,
    /// Entity identifier (a client or staff id, or a fixed key such as
    /// `SALARY_EXPENSE`).
    pub entity_id: Option<String>,
    /// Head the ledger belongs under.
    pub head: HeadCode,
    /// Display name for entity types that have no record to take it from.
    pub name: Option<String>,
}

impl EnsureLedger {
    /// Request for a ledger keyed by a fixed identifier.
    #[must_use]
    pub fn internal(key: &str, name: &str, head: HeadCode) -> Self {
        Self {
            entity_type: EntityType::Internal,
            entity_id: Some(key.to_string()),
            head,
            name: Some(name.to_string()),
        }
    }

    /// Request for a ledger bound to a client or staff record.
    #[must_use]
    pub fn record(entity_type: EntityType, id: Uuid, head: HeadCode) -> Self {
        Self {
            entity_type,
            entity_id: Some(id.to_string()),
            head,
            name: None,
        }
    }
}

/// What provisioning did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A new ledger was created.
    Created,
    /// An existing ledger was re-linked or renamed.
    Updated,
    /// An existing ledger already matched.
    Unchanged,
}

/// A provisioned ledger.
#[derive(Debug, Clone)]
pub struct ProvisionedLedger {
    /// The ledger.
    pub ledger: ledgers::Model,
    /// What provisioning did.
    pub outcome: ProvisionOutcome,
}

/// Counts from [`LedgerRepository::sync_entity_ledgers`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Clients visited.
    pub clients: usize,
    /// Staff members visited.
    pub staff: usize,
    /// Ledgers created.
    pub created: usize,
    /// Ledgers reconciled.
    pub updated: usize,
}

impl SyncSummary {
    fn record(&mut self, outcome: ProvisionOutcome) {
        match outcome {
            ProvisionOutcome::Created => self.created += 1,
            ProvisionOutcome::Updated => self.updated += 1,
            ProvisionOutcome::Unchanged => {}
        }
    }
}

/// Ledger repository for chart-of-accounts operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
    chart: ChartOfAccounts,
    sequences: SequenceAllocator,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(
        db: DatabaseConnection,
        chart: ChartOfAccounts,
        sequences: SequenceAllocator,
    ) -> Self {
        Self {
            db,
            chart,
            sequences,
        }
    }

    /// Returns the resolved chart of accounts.
    #[must_use]
    pub const fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Lists every account head by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_heads(&self) -> StoreResult<Vec<account_heads::Model>> {
        chart::list_heads(&self.db).await
    }

    /// Creates a ledger, posting its opening balance if one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is blank or the head does not exist
    /// - The opening balance adjustment ledger is missing
    /// - The generated code collides with a concurrent insert
    /// - Database operation fails
    pub async fn create_ledger(&self, input: CreateLedgerInput) -> StoreResult<ledgers::Model> {
        let txn = self.db.begin().await?;
        let ledger = create_in(&txn, &self.sequences, &input).await?;
        txn.commit().await?;
        Ok(ledger)
    }

    /// Updates a ledger's name, description, or status.
    ///
    /// # Errors
    ///
    /// Returns `LedgerNotFound`, `EmptyLedgerName`, or a database error.
    pub async fn update_ledger(
        &self,
        ledger_id: Uuid,
        input: UpdateLedgerInput,
    ) -> StoreResult<ledgers::Model> {
        let ledger = find_ledger(&self.db, ledger_id).await?;
        let mut active: ledgers::ActiveModel = ledger.into();

        if let Some(name) = input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(LedgerError::EmptyLedgerName.into());
            }
            active.name = Set(name.to_string());
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Moves a ledger's natural balance to `target` by posting the
    /// difference against the opening balance adjustment ledger.
    ///
    /// Differences below one cent post nothing.
    ///
    /// # Errors
    ///
    /// Returns `LedgerNotFound`, `SystemLedgerMissing`, or a database error.
    pub async fn set_balance(
        &self,
        ledger_id: Uuid,
        target: Decimal,
        adjusted_by: &str,
    ) -> StoreResult<ledgers::Model> {
        let txn = self.db.begin().await?;

        let ledger = find_ledger(&txn, ledger_id).await?;
        let head = find_head(&txn, ledger.head_id).await?;
        let nature = HeadType::from(head.head_type).nature();
        let current = nature.natural_balance(ledger.balance());
        let difference = round_money(target - current);

        if difference.is_zero() {
            txn.commit().await?;
            return Ok(ledger);
        }

        let adjustment = find_opening_adjustment(&txn).await?;
        post_in(
            &txn,
            &self.sequences,
            NewJournalEntry {
                date: Utc::now().date_naive(),
                description: format!("Manual balance update from {current} to {target}"),
                amount: difference.abs(),
                entry_type: EntryType::Journal,
                reference: Some(MANUAL_EDIT_REFERENCE.to_string()),
                nature: EntryNature::General,
                entity_id: None,
                created_by: adjusted_by.to_string(),
                lines: adjustment_lines(nature, ledger.id, adjustment.id, difference),
            },
        )
        .await?;

        let ledger = find_ledger(&txn, ledger_id).await?;
        txn.commit().await?;
        Ok(ledger)
    }

    /// Deletes a ledger that owns no journal lines.
    ///
    /// # Errors
    ///
    /// Returns `LedgerNotFound`, `LedgerHasLines`, or a database error.
    pub async fn delete_ledger(&self, ledger_id: Uuid) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        let ledger = find_ledger(&txn, ledger_id).await?;
        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::LedgerId.eq(ledger_id))
            .count(&txn)
            .await?;
        if lines > 0 {
            return Err(LedgerError::LedgerHasLines { ledger_id, lines }.into());
        }

        ledgers::Entity::delete_by_id(ledger.id).exec(&txn).await?;
        txn.commit().await?;

        info!(ledger_id = %ledger_id, ledger_code = %ledger.ledger_code, "Ledger deleted");
        Ok(())
    }

    /// Gets a ledger with its head.
    ///
    /// # Errors
    ///
    /// Returns `LedgerNotFound` or a database error.
    pub async fn get_ledger(&self, ledger_id: Uuid) -> StoreResult<LedgerWithHead> {
        let ledger = find_ledger(&self.db, ledger_id).await?;
        let head = find_head(&self.db, ledger.head_id).await?;
        Ok(LedgerWithHead { ledger, head })
    }

    /// Lists ledgers by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_ledgers(&self, filter: LedgerFilter) -> StoreResult<Vec<LedgerWithHead>> {
        let mut query = ledgers::Entity::find();

        if let Some(head_id) = filter.head_id {
            query = query.filter(ledgers::Column::HeadId.eq(head_id));
        }
        if let Some(entity_type) = filter.entity_type {
            query = query.filter(ledgers::Column::EntityType.eq(stored::EntityType::from(entity_type)));
        }
        if let Some(status) = filter.status {
            query = query.filter(ledgers::Column::Status.eq(status));
        }

        let rows = query
            .find_also_related(account_heads::Entity)
            .order_by_asc(ledgers::Column::Name)
            .order_by_asc(ledgers::Column::LedgerCode)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(ledger, head)| head.map(|head| LedgerWithHead { ledger, head }))
            .collect())
    }

    /// Finds or creates the ledger of an entity and reconciles drift.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity cannot be resolved or the database
    /// operation fails.
    pub async fn ensure_ledger(&self, request: EnsureLedger) -> StoreResult<ProvisionedLedger> {
        let txn = self.db.begin().await?;
        let provisioned = ensure_in(&txn, &self.chart, &self.sequences, &request).await?;
        txn.commit().await?;
        Ok(provisioned)
    }

    /// Ensures a receivable ledger for every client and a payable ledger
    /// for every staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if any ledger cannot be provisioned.
    pub async fn sync_entity_ledgers(&self) -> StoreResult<SyncSummary> {
        let txn = self.db.begin().await?;
        let mut summary = SyncSummary::default();

        let client_ids: Vec<Uuid> = clients::Entity::find()
            .order_by_asc(clients::Column::Name)
            .all(&txn)
            .await?
            .into_iter()
            .map(|client| client.id)
            .collect();
        for id in client_ids {
            let request = EnsureLedger::record(EntityType::Client, id, HeadCode::Assets);
            let provisioned = ensure_in(&txn, &self.chart, &self.sequences, &request).await?;
            summary.clients += 1;
            summary.record(provisioned.outcome);
        }

        let staff_ids: Vec<Uuid> = staff::Entity::find()
            .order_by_asc(staff::Column::FullName)
            .all(&txn)
            .await?
            .into_iter()
            .map(|member| member.id)
            .collect();
        for id in staff_ids {
            let request = EnsureLedger::record(EntityType::Staff, id, HeadCode::Liabilities);
            let provisioned = ensure_in(&txn, &self.chart, &self.sequences, &request).await?;
            summary.staff += 1;
            summary.record(provisioned.outcome);
        }

        txn.commit().await?;
        info!(
            clients = summary.clients,
            staff = summary.staff,
            created = summary.created,
            updated = summary.updated,
            "Entity ledgers synced"
        );
        Ok(summary)
    }
}

/// Finds a ledger by id.
pub(crate) async fn find_ledger<C: ConnectionTrait>(
    conn: &C,
    ledger_id: Uuid,
) -> StoreResult<ledgers::Model> {
    ledgers::Entity::find_by_id(ledger_id)
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::LedgerNotFound(ledger_id).into())
}

async fn find_head<C: ConnectionTrait>(
    conn: &C,
    head_id: Uuid,
) -> StoreResult<account_heads::Model> {
    account_heads::Entity::find_by_id(head_id)
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::HeadNotFound(head_id.to_string()).into())
}

async fn find_opening_adjustment<C: ConnectionTrait>(conn: &C) -> StoreResult<ledgers::Model> {
    ledgers::Entity::find()
        .filter(ledgers::Column::EntityType.eq(stored::EntityType::Adjustment))
        .filter(ledgers::Column::Name.eq(OPENING_BALANCE_LEDGER))
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::SystemLedgerMissing(OPENING_BALANCE_LEDGER.to_string()).into())
}

/// Legs moving `ledger_id`'s natural balance by `change` against `adjustment_id`.
fn adjustment_lines(
    nature: BalanceNature,
    ledger_id: Uuid,
    adjustment_id: Uuid,
    change: Decimal,
) -> JournalLines {
    let increases = change > Decimal::ZERO;
    let debit_ledger = matches!(
        (nature, increases),
        (BalanceNature::DebitNormal, true) | (BalanceNature::CreditNormal, false)
    );
    if debit_ledger {
        JournalLines::Pair {
            debit_ledger_id: ledger_id,
            credit_ledger_id: adjustment_id,
        }
    } else {
        JournalLines::Pair {
            debit_ledger_id: adjustment_id,
            credit_ledger_id: ledger_id,
        }
    }
}

/// Creates a ledger inside an open transaction.
pub(crate) async fn create_in(
    txn: &DatabaseTransaction,
    sequences: &SequenceAllocator,
    input: &CreateLedgerInput,
) -> StoreResult<ledgers::Model> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(LedgerError::EmptyLedgerName.into());
    }

    let head = find_head(txn, input.head_id).await?;
    let code = sequences.next_ledger_code(txn).await?;
    let now = Utc::now().into();

    let ledger = ledgers::ActiveModel {
        id: Set(Uuid::new_v4()),
        ledger_code: Set(code.clone()),
        name: Set(name.to_string()),
        head_id: Set(head.id),
        entity_type: Set(input.entity_type.into()),
        entity_id: Set(input.entity_id.clone()),
        description: Set(input.description.clone()),
        balance_minor: Set(0),
        status: Set(LedgerStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await
    .map_err(|err| StoreError::from_insert(err, &code))?;

    info!(
        ledger_id = %ledger.id,
        ledger_code = %ledger.ledger_code,
        name = %ledger.name,
        entity_type = %input.entity_type,
        "Ledger created"
    );

    let Some(opening) = input.opening_balance.map(round_money).filter(|a| !a.is_zero()) else {
        return Ok(ledger);
    };

    let adjustment = find_opening_adjustment(txn).await?;
    let nature = HeadType::from(head.head_type).nature();
    post_in(
        txn,
        sequences,
        NewJournalEntry {
            date: input
                .opening_balance_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            description: format!("Opening Balance for {}", ledger.name),
            amount: opening.abs(),
            entry_type: EntryType::Journal,
            reference: Some(OPENING_BALANCE_REFERENCE.to_string()),
            nature: EntryNature::General,
            entity_id: None,
            created_by: input.created_by.clone(),
            lines: adjustment_lines(nature, ledger.id, adjustment.id, opening),
        },
    )
    .await?;

    find_ledger(txn, ledger.id).await
}

/// Resolves the display name of the entity behind a ledger.
async fn resolve_entity_name(
    txn: &DatabaseTransaction,
    request: &EnsureLedger,
) -> StoreResult<String> {
    let entity_type = request.entity_type;
    if !entity_type.is_named_by_record() {
        return request
            .name
            .clone()
            .or_else(|| request.entity_id.clone())
            .ok_or_else(|| LedgerError::MissingEntityReference(entity_type.to_string()).into());
    }

    let raw_id = request
        .entity_id
        .as_deref()
        .ok_or_else(|| LedgerError::MissingEntityReference(entity_type.to_string()))?;
    let not_found = || LedgerError::EntityNotFound {
        entity_type: entity_type.to_string(),
        entity_id: raw_id.to_string(),
    };
    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;

    let name = match entity_type {
        EntityType::Client => {
            clients::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or_else(not_found)?
                .name
        }
        EntityType::StaffAdvance => staff::Entity::find_by_id(id)
            .one(txn)
            .await?
            .ok_or_else(not_found)?
            .advance_ledger_name(),
        _ => {
            staff::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or_else(not_found)?
                .full_name
        }
    };
    Ok(name)
}

/// Finds or creates the ledger of an entity inside an open transaction.
///
/// Lookup is by `(entity_type, entity_id)` first, then by
/// `(entity_type, name)` among unbound ledgers. A name match gets linked to
/// the entity and is logged for review.
pub(crate) async fn ensure_in(
    txn: &DatabaseTransaction,
    chart: &ChartOfAccounts,
    sequences: &SequenceAllocator,
    request: &EnsureLedger,
) -> StoreResult<ProvisionedLedger> {
    let head_id = chart.head_id(request.head)?;
    let name = resolve_entity_name(txn, request).await?;
    let entity_type = stored::EntityType::from(request.entity_type);

    let mut existing = None;
    if let Some(entity_id) = &request.entity_id {
        existing = ledgers::Entity::find()
            .filter(ledgers::Column::EntityType.eq(entity_type))
            .filter(ledgers::Column::EntityId.eq(entity_id.as_str()))
            .order_by_asc(ledgers::Column::LedgerCode)
            .one(txn)
            .await?;
    }

    if existing.is_none() {
        let mut by_name = ledgers::Entity::find()
            .filter(ledgers::Column::EntityType.eq(entity_type))
            .filter(ledgers::Column::Name.eq(name.as_str()));
        if request.entity_id.is_some() {
            by_name = by_name.filter(ledgers::Column::EntityId.is_null());
        }
        existing = by_name
            .order_by_asc(ledgers::Column::LedgerCode)
            .one(txn)
            .await?;

        if let (Some(ledger), Some(entity_id)) = (&existing, &request.entity_id) {
            warn!(
                ledger_id = %ledger.id,
                ledger_code = %ledger.ledger_code,
                entity_type = %request.entity_type,
                entity_id = %entity_id,
                "Ledger linked by name, verify"
            );
        }
    }

    let Some(ledger) = existing else {
        let ledger = create_in(
            txn,
            sequences,
            &CreateLedgerInput {
                name,
                head_id,
                entity_type: request.entity_type,
                entity_id: request.entity_id.clone(),
                description: Some(format!("Auto-created for {}", request.entity_type)),
                opening_balance: None,
                opening_balance_date: None,
                created_by: SYSTEM_USER.to_string(),
            },
        )
        .await?;
        return Ok(ProvisionedLedger {
            ledger,
            outcome: ProvisionOutcome::Created,
        });
    };

    let entity_id = request.entity_id.clone().or_else(|| ledger.entity_id.clone());
    if ledger.head_id == head_id && ledger.entity_id == entity_id && ledger.name == name {
        return Ok(ProvisionedLedger {
            ledger,
            outcome: ProvisionOutcome::Unchanged,
        });
    }

    let mut active: ledgers::ActiveModel = ledger.into();
    active.head_id = Set(head_id);
    active.entity_id = Set(entity_id);
    active.name = Set(name);
    active.updated_at = Set(Utc::now().into());
    let ledger = active.update(txn).await?;

    info!(
        ledger_id = %ledger.id,
        ledger_code = %ledger.ledger_code,
        "Ledger reconciled with its entity"
    );
    Ok(ProvisionedLedger {
        ledger,
        outcome: ProvisionOutcome::Updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_adjustment_lines_follow_nature() {
        let ledger = Uuid::new_v4();
        let adjustment = Uuid::new_v4();

        assert_eq!(
            adjustment_lines(BalanceNature::DebitNormal, ledger, adjustment, dec!(100)),
            JournalLines::Pair {
                debit_ledger_id: ledger,
                credit_ledger_id: adjustment,
            }
        );
        assert_eq!(
            adjustment_lines(BalanceNature::CreditNormal, ledger, adjustment, dec!(100)),
            JournalLines::Pair {
                debit_ledger_id: adjustment,
                credit_ledger_id: ledger,
            }
        );
        assert_eq!(
            adjustment_lines(BalanceNature::CreditNormal, ledger, adjustment, dec!(-100)),
            JournalLines::Pair {
                debit_ledger_id: ledger,
                credit_ledger_id: adjustment,
            }
        );
    }

    #[test]
    fn test_sync_summary_counts_outcomes() {
        let mut summary = SyncSummary::default();
        summary.record(ProvisionOutcome::Created);
        summary.record(ProvisionOutcome::Updated);
        summary.record(ProvisionOutcome::Unchanged);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
    }
}
