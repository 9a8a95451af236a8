//! Shared fixtures: an in-memory SQLite database, migrated and seeded.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use payledger_core::ledger::{EntityType, EntryNature, EntryType, HeadCode};
use payledger_core::payroll::AttendanceStatus;
use payledger_db::entities::sea_orm_active_enums::LeaveStatus;
use payledger_db::entities::{attendance_records, clients, leave_requests, ledgers, staff};
use payledger_db::migration::Migrator;
use payledger_db::repositories::{
    CreateLedgerInput, EntryWithLines, RecordTransactionInput, SlipWithStaff,
};
use payledger_db::{
    ChartOfAccounts, JournalRepository, LedgerRepository, PayrollRepository, ReportRepository,
    SequenceAllocator, seed_chart_of_accounts,
};
use payledger_shared::config::{LedgerConfig, PayrollConfig};
use payledger_shared::types::{from_minor_units, to_minor_units};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

/// Repositories over one seeded database.
pub struct TestContext {
    pub db: DatabaseConnection,
    pub sequences: SequenceAllocator,
    pub chart: ChartOfAccounts,
    pub ledgers: LedgerRepository,
    pub journal: JournalRepository,
    pub reports: ReportRepository,
}

impl TestContext {
    /// Payroll repository with a fixed "today".
    pub fn payroll(&self, config: PayrollConfig, today: NaiveDate) -> PayrollRepository {
        PayrollRepository::new(
            self.db.clone(),
            self.chart.clone(),
            self.sequences.clone(),
            config,
        )
        .with_clock(Arc::new(move || today))
    }

    /// Creates a ledger without an opening balance.
    pub async fn ledger(&self, name: &str, head: HeadCode, entity_type: EntityType) -> ledgers::Model {
        self.ledgers
            .create_ledger(CreateLedgerInput {
                name: name.to_string(),
                head_id: self.chart.head_id(head).unwrap(),
                entity_type,
                entity_id: None,
                description: None,
                opening_balance: None,
                opening_balance_date: None,
                created_by: "tester".to_string(),
            })
            .await
            .unwrap()
    }

    /// The seeded bank ledger.
    pub async fn bank(&self) -> ledgers::Model {
        self.system_ledger("Main Bank Account").await
    }

    /// A seeded system ledger by name.
    pub async fn system_ledger(&self, name: &str) -> ledgers::Model {
        ledgers::Entity::find()
            .filter(ledgers::Column::Name.eq(name))
            .one(&self.db)
            .await
            .unwrap()
            .unwrap()
    }

    /// Stored (debit-positive) balance of a ledger.
    pub async fn balance(&self, ledger_id: Uuid) -> Decimal {
        ledgers::Entity::find_by_id(ledger_id)
            .one(&self.db)
            .await
            .unwrap()
            .unwrap()
            .balance()
    }

    /// Posts `amount` from one ledger to another.
    pub async fn transfer(
        &self,
        from: Uuid,
        to: Uuid,
        amount: Decimal,
        date: NaiveDate,
    ) -> EntryWithLines {
        self.journal
            .record_transaction(RecordTransactionInput {
                date,
                description: "Transfer".to_string(),
                amount,
                entry_type: EntryType::Journal,
                from_ledger_id: from,
                to_ledger_id: to,
                reference: None,
                nature: EntryNature::General,
                entity_id: None,
                created_by: "tester".to_string(),
            })
            .await
            .unwrap()
    }

    /// Asserts every ledger's cached balance matches its lines.
    pub async fn assert_balances_consistent(&self) {
        let all = ledgers::Entity::find().all(&self.db).await.unwrap();
        for ledger in all {
            let check = self.reports.verify_ledger_balance(ledger.id).await.unwrap();
            assert!(
                check.is_consistent(),
                "ledger {} drifted: stored {} computed {}",
                ledger.name,
                check.stored_balance,
                check.computed_balance
            );
        }
    }
}

/// Opens a fresh in-memory database, migrates it, and seeds the chart.
pub async fn setup() -> TestContext {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // One connection: every pooled connection would get its own database.
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let sequences = SequenceAllocator::new(&LedgerConfig::default());
    seed_chart_of_accounts(&db, &sequences).await.unwrap();
    let chart = ChartOfAccounts::load(&db).await.unwrap();

    TestContext {
        ledgers: LedgerRepository::new(db.clone(), chart.clone(), sequences.clone()),
        journal: JournalRepository::new(db.clone(), sequences.clone()),
        reports: ReportRepository::new(db.clone()),
        db,
        sequences,
        chart,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn minor(amount: Decimal) -> i64 {
    to_minor_units(amount).unwrap()
}

pub async fn create_client(db: &DatabaseConnection, name: &str) -> clients::Model {
    clients::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        advance_balance_minor: Set(0),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_staff(
    db: &DatabaseConnection,
    name: &str,
    staff_number: Option<&str>,
    basic: Decimal,
) -> staff::Model {
    staff::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(name.to_string()),
        staff_number: Set(staff_number.map(str::to_string)),
        basic_minor: Set(minor(basic)),
        hra_minor: Set(0),
        conveyance_minor: Set(0),
        accommodation_minor: Set(0),
        allowances_minor: Set(0),
        advance_balance_minor: Set(0),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn staff_advance(db: &DatabaseConnection, staff_id: Uuid) -> Decimal {
    staff::Entity::find_by_id(staff_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .advance_balance()
}

pub async fn client_advance(db: &DatabaseConnection, client_id: Uuid) -> Decimal {
    from_minor_units(
        clients::Entity::find_by_id(client_id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .advance_balance_minor,
    )
}

pub async fn attend(
    db: &DatabaseConnection,
    staff_id: Uuid,
    day: NaiveDate,
    status: AttendanceStatus,
) {
    attendance_records::ActiveModel {
        id: Set(Uuid::new_v4()),
        staff_id: Set(staff_id),
        attendance_date: Set(day),
        status: Set(status.into()),
    }
    .insert(db)
    .await
    .unwrap();
}

/// Marks every non-Sunday of the month up to `until` PRESENT, except the
/// given days which get `ABSENT`.
pub async fn mark_month(
    db: &DatabaseConnection,
    staff_id: Uuid,
    year: i32,
    month: u32,
    until: u32,
    absent: &[u32],
) {
    for day in 1..=until {
        let Some(current) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        if current.weekday() == Weekday::Sun {
            continue;
        }
        let status = if absent.contains(&day) {
            AttendanceStatus::Absent
        } else {
            AttendanceStatus::Present
        };
        attend(db, staff_id, current, status).await;
    }
}

/// Marks every non-Sunday of the month up to `until` PRESENT, leaving the
/// given days without a record.
pub async fn mark_present_except(
    db: &DatabaseConnection,
    staff_id: Uuid,
    year: i32,
    month: u32,
    until: u32,
    skip: &[u32],
) {
    for day in (1..=until).filter(|day| !skip.contains(day)) {
        let Some(current) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        if current.weekday() != Weekday::Sun {
            attend(db, staff_id, current, AttendanceStatus::Present).await;
        }
    }
}

pub async fn request_leave(
    db: &DatabaseConnection,
    staff_id: Uuid,
    leave_type: &str,
    status: LeaveStatus,
    start: NaiveDate,
    end: NaiveDate,
) {
    leave_requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        staff_id: Set(staff_id),
        leave_type: Set(leave_type.to_string()),
        status: Set(status),
        start_date: Set(start),
        end_date: Set(end),
    }
    .insert(db)
    .await
    .unwrap();
}

pub fn names(slips: &[SlipWithStaff]) -> Vec<&str> {
    slips.iter().map(|view| view.staff_name.as_str()).collect()
}
