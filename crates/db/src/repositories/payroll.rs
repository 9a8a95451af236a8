//! Payroll repository: holidays, loss-of-pay, salary drafts, and settlement.
//!
//! Slips move DRAFT (computed, not stored) → PENDING (saved) → PAID.
//! Settlement provisions the ledgers it needs and posts its entries inside
//! one database transaction, so a failure leaves no partial postings and no
//! slip marked paid.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use payledger_core::ledger::{EntityType, EntryNature, EntryType, HeadCode, JournalLines};
use payledger_core::payroll::{
    AdvanceShare, AttendanceDay, HolidayCalendar, LeaveSpan, LopBreakdown, LopCalculator, PAYROLL_DAY_DIVISOR,
    PayPeriod, PayrollError, PayrollType, PostingPlan, SalaryCalculator, SalaryFigures,
    SalaryInput, SalaryStructure, SettlementPlanner, SlipObligation, SlipStatus,
};
use payledger_shared::config::PayrollConfig;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::chart::ChartOfAccounts;
use super::error::StoreResult;
use super::journal::{EntryWithLines, NewJournalEntry, post_in};
use super::ledger::{EnsureLedger, SYSTEM_USER, ensure_in};
use super::minor;
use super::sequence::SequenceAllocator;
use crate::entities::sea_orm_active_enums::{self as stored, LeaveStatus, LedgerStatus, RunStatus};
use crate::entities::{
    attendance_records, holidays, leave_requests, ledgers, payroll_runs, payroll_slips, staff,
};

/// Source of "today" for payroll calculations.
pub type PayrollClock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Key of the internal salary expense ledger.
pub const SALARY_EXPENSE_KEY: &str = "SALARY_EXPENSE";

/// Key of the bank ledger provisioned when no bank ledger exists.
pub const MAIN_BANK_KEY: &str = "MAIN_BANK";

/// Input for creating a holiday.
#[derive(Debug, Clone)]
pub struct CreateHolidayInput {
    /// Holiday name.
    pub name: String,
    /// Date of the holiday.
    pub date: NaiveDate,
    /// Repeats every year on the same month and day.
    pub recurring: bool,
}

/// A computed (or stored, once paid) salary slip for one staff member.
#[derive(Debug, Clone, Serialize)]
pub struct SalaryDraft {
    /// Staff member.
    pub staff_id: Uuid,
    /// Staff member's name.
    pub staff_name: String,
    /// Payroll year.
    pub year: i32,
    /// Payroll month.
    pub month: u32,
    /// Period label such as `Mar 2026`.
    pub period: String,
    /// Full month or till-date proration.
    pub payroll_type: PayrollType,
    /// Day the figures are computed for.
    pub calculation_date: NaiveDate,
    /// Fixed monthly components.
    pub structure: SalaryStructure,
    /// Computed figures.
    pub figures: SalaryFigures,
    /// LOP breakdown; `None` for a paid slip.
    pub lop: Option<LopBreakdown>,
    /// Stored slip, if one exists.
    pub slip_id: Option<Uuid>,
    /// Stored slip status; `None` while the draft is only computed.
    pub status: Option<SlipStatus>,
}

/// Input for saving a slip.
#[derive(Debug, Clone)]
pub struct SaveSlipInput {
    /// Staff member.
    pub staff_id: Uuid,
    /// Payroll year.
    pub year: i32,
    /// Payroll month.
    pub month: u32,
    /// End of the LOP window and till-date calculation.
    pub as_of: Option<NaiveDate>,
    /// Full month or till-date proration.
    pub payroll_type: PayrollType,
    /// Manual incentive.
    pub incentives: Decimal,
    /// Manual deduction.
    pub other_deductions: Decimal,
}

/// A slip with its staff member's identity.
#[derive(Debug, Clone, Serialize)]
pub struct SlipWithStaff {
    /// The slip.
    pub slip: payroll_slips::Model,
    /// Staff member's name.
    pub staff_name: String,
    /// Staff number, if any.
    pub staff_number: Option<String>,
}

/// A payroll run with its slips and totals.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollRunDetails {
    /// The run, if one exists for the period.
    pub run: Option<payroll_runs::Model>,
    /// Its slips, exempt staff excluded.
    pub slips: Vec<SlipWithStaff>,
    /// `Σ net_pay`.
    pub total_payout: Decimal,
    /// `Σ (lop_deduction + advance_salary + other_deductions)`.
    pub total_deductions: Decimal,
}

/// Filter options for listing slips.
#[derive(Debug, Clone, Default)]
pub struct SlipFilter {
    /// Run year.
    pub year: Option<i32>,
    /// Run month.
    pub month: Option<u32>,
    /// Staff member.
    pub staff_id: Option<Uuid>,
}

/// Result of settling one slip or a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementSummary {
    /// Slips marked paid.
    pub slip_ids: Vec<Uuid>,
    /// `Σ net_pay` settled.
    pub net_pay: Decimal,
    /// `Σ advance_salary` recovered.
    pub advance_recovered: Decimal,
    /// Accrual entry, unless every amount was zero.
    pub accrual: Option<EntryWithLines>,
    /// Payment entry (individual settlement only).
    pub payment: Option<EntryWithLines>,
}

/// Payroll repository.
#[derive(Clone)]
pub struct PayrollRepository {
    db: DatabaseConnection,
    chart: ChartOfAccounts,
    sequences: SequenceAllocator,
    config: PayrollConfig,
    clock: PayrollClock,
}

impl fmt::Debug for PayrollRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayrollRepository")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PayrollRepository {
    /// Creates a payroll repository whose "today" is the current date at
    /// the configured UTC offset.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        chart: ChartOfAccounts,
        sequences: SequenceAllocator,
        config: PayrollConfig,
    ) -> Self {
        let offset = config.utc_offset();
        Self {
            db,
            chart,
            sequences,
            config,
            clock: Arc::new(move || Utc::now().with_timezone(&offset).date_naive()),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: PayrollClock) -> Self {
        self.clock = clock;
        self
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    fn ensure_not_exempt(&self, member: &staff::Model) -> Result<(), PayrollError> {
        SalaryCalculator::ensure_not_exempt(
            member.id,
            member.staff_number.as_deref(),
            &self.config.exempt_staff_numbers,
        )
    }

    fn is_exempt(&self, member: &staff::Model) -> bool {
        self.ensure_not_exempt(member).is_err()
    }

    // ========== Holidays ==========

    /// Lists holidays by date; with a year, that year's fixed holidays plus
    /// every recurring one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` for an unsupported year or a database error.
    pub async fn list_holidays(&self, year: Option<i32>) -> StoreResult<Vec<holidays::Model>> {
        let mut query = holidays::Entity::find();

        if let Some(year) = year {
            let start = PayPeriod::new(year, 1)?.first_day();
            let end = PayPeriod::new(year, 12)?.last_day();
            query = query.filter(
                Condition::any()
                    .add(holidays::Column::Recurring.eq(true))
                    .add(holidays::Column::HolidayDate.between(start, end)),
            );
        }

        Ok(query
            .order_by_asc(holidays::Column::HolidayDate)
            .all(&self.db)
            .await?)
    }

    /// Creates a holiday.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_holiday(&self, input: CreateHolidayInput) -> StoreResult<holidays::Model> {
        let holiday = holidays::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            holiday_date: Set(input.date),
            recurring: Set(input.recurring),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(holiday_id = %holiday.id, date = %holiday.holiday_date, "Holiday created");
        Ok(holiday)
    }

    /// Deletes a holiday.
    ///
    /// # Errors
    ///
    /// Returns `HolidayNotFound` or a database error.
    pub async fn delete_holiday(&self, holiday_id: Uuid) -> StoreResult<()> {
        let result = holidays::Entity::delete_by_id(holiday_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(PayrollError::HolidayNotFound(holiday_id).into());
        }
        Ok(())
    }

    // ========== Drafts ==========

    /// Counts a staff member's loss-of-pay days for a month.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod`, `StaffNotFound`, or a database error.
    pub async fn calculate_auto_lop(
        &self,
        staff_id: Uuid,
        year: i32,
        month: u32,
        as_of: Option<NaiveDate>,
    ) -> StoreResult<LopBreakdown> {
        let period = PayPeriod::new(year, month)?;
        let member = find_staff(&self.db, staff_id).await?;
        self.lop_in(&self.db, member.id, &period, as_of).await
    }

    /// Computes a staff member's salary draft for a month.
    ///
    /// A PENDING slip is overlaid: LOP, advance, gross, and net are
    /// recomputed while its incentives and manual deductions are kept. A
    /// PAID slip is returned as stored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod`, `StaffNotFound`, `ExemptEmployee`, or a
    /// database error.
    pub async fn get_salary_draft(
        &self,
        staff_id: Uuid,
        year: i32,
        month: u32,
        as_of: Option<NaiveDate>,
        payroll_type: PayrollType,
    ) -> StoreResult<SalaryDraft> {
        let period = PayPeriod::new(year, month)?;
        let member = find_staff(&self.db, staff_id).await?;
        self.ensure_not_exempt(&member)?;

        let existing = find_slip_for_period(&self.db, staff_id, &period).await?;
        let (structure, incentives, other_deductions) = match &existing {
            Some(slip) if slip.status == stored::SlipStatus::Paid => {
                return Ok(self.paid_draft(&member, &period, as_of, slip));
            }
            Some(slip) => (
                slip.salary_structure(),
                slip.incentives(),
                slip.other_deductions(),
            ),
            None => (member.salary_structure(), Decimal::ZERO, Decimal::ZERO),
        };

        let (calculation_date, lop, figures) = self
            .draft_in(
                &self.db,
                &member,
                &period,
                payroll_type,
                as_of,
                structure,
                incentives,
                other_deductions,
            )
            .await?;

        Ok(SalaryDraft {
            staff_id,
            staff_name: member.full_name,
            year: period.year(),
            month: period.month(),
            period: period.label(),
            payroll_type,
            calculation_date,
            structure,
            figures,
            lop: Some(lop),
            slip_id: existing.as_ref().map(|slip| slip.id),
            status: existing.map(|slip| slip.status.into()),
        })
    }

    /// Recomputes a draft with the given manual fields and stores it as a
    /// PENDING slip in the period's run, creating the run if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The period is invalid or the staff member does not exist
    /// - The staff member is exempt
    /// - The run is already paid (`PayrollLocked`) or the slip is paid
    /// - Database operation fails
    pub async fn save_payroll_slip(&self, input: SaveSlipInput) -> StoreResult<payroll_slips::Model> {
        let period = PayPeriod::new(input.year, input.month)?;
        let (year_key, month_key) = period_key(&period);

        let txn = self.db.begin().await?;

        let member = find_staff(&txn, input.staff_id).await?;
        self.ensure_not_exempt(&member)?;

        let run = match find_run(&txn, &period).await? {
            Some(run) if run.status == RunStatus::Paid => {
                return Err(PayrollError::PayrollLocked {
                    year: period.year(),
                    month: period.month(),
                }
                .into());
            }
            Some(run) => run,
            None => {
                payroll_runs::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    year: Set(year_key),
                    month: Set(month_key),
                    status: Set(RunStatus::Draft),
                    payroll_type: Set(input.payroll_type.into()),
                    processed_at: Set(None),
                    created_at: Set(Utc::now().into()),
                }
                .insert(&txn)
                .await?
            }
        };

        let existing = payroll_slips::Entity::find()
            .filter(payroll_slips::Column::RunId.eq(run.id))
            .filter(payroll_slips::Column::StaffId.eq(member.id))
            .one(&txn)
            .await?;
        if let Some(slip) = &existing {
            if slip.status == stored::SlipStatus::Paid {
                return Err(PayrollError::SlipAlreadyPaid(slip.id).into());
            }
        }

        let structure = member.salary_structure();
        let (_, lop, figures) = self
            .draft_in(
                &txn,
                &member,
                &period,
                input.payroll_type,
                input.as_of,
                structure,
                input.incentives,
                input.other_deductions,
            )
            .await?;

        let now = Utc::now().into();
        let is_new = existing.is_none();
        let mut slip: payroll_slips::ActiveModel = match existing {
            Some(slip) => slip.into(),
            None => payroll_slips::ActiveModel {
                id: Set(Uuid::new_v4()),
                run_id: Set(run.id),
                staff_id: Set(member.id),
                paid_at: Set(None),
                created_at: Set(now),
                ..Default::default()
            },
        };
        slip.basic_minor = Set(minor(structure.basic)?);
        slip.hra_minor = Set(minor(structure.hra)?);
        slip.conveyance_minor = Set(minor(structure.conveyance)?);
        slip.accommodation_minor = Set(minor(structure.accommodation)?);
        slip.allowances_minor = Set(minor(structure.allowances)?);
        slip.incentives_minor = Set(minor(figures.incentives)?);
        slip.lop_half_days = Set(i32::try_from(lop.total_half_days()).unwrap_or(i32::MAX));
        slip.lop_deduction_minor = Set(minor(figures.lop_deduction)?);
        slip.advance_salary_minor = Set(minor(figures.advance_salary)?);
        slip.other_deductions_minor = Set(minor(figures.other_deductions)?);
        slip.gross_total_minor = Set(minor(figures.gross_total)?);
        slip.net_pay_minor = Set(minor(figures.net_pay)?);
        slip.total_working_days = Set(i32::try_from(figures.total_working_days).unwrap_or(i32::MAX));
        slip.payroll_type = Set(input.payroll_type.into());
        slip.status = Set(stored::SlipStatus::Pending);
        slip.updated_at = Set(now);

        let slip = if is_new {
            slip.insert(&txn).await?
        } else {
            slip.update(&txn).await?
        };

        txn.commit().await?;

        info!(
            slip_id = %slip.id,
            staff_id = %member.id,
            period = %period.label(),
            net_pay = %figures.net_pay,
            "Payroll slip saved"
        );
        Ok(slip)
    }

    /// Gets a period's run with its slips and totals.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` or a database error.
    pub async fn get_payroll_run_details(
        &self,
        year: i32,
        month: u32,
    ) -> StoreResult<PayrollRunDetails> {
        let period = PayPeriod::new(year, month)?;
        let Some(run) = find_run(&self.db, &period).await? else {
            return Ok(PayrollRunDetails {
                run: None,
                slips: Vec::new(),
                total_payout: Decimal::ZERO,
                total_deductions: Decimal::ZERO,
            });
        };

        let rows = payroll_slips::Entity::find()
            .filter(payroll_slips::Column::RunId.eq(run.id))
            .find_also_related(staff::Entity)
            .order_by_asc(payroll_slips::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let slips = self.slip_views(rows);

        Ok(PayrollRunDetails {
            run: Some(run),
            total_payout: slips.iter().map(|view| view.slip.net_pay()).sum(),
            total_deductions: slips.iter().map(|view| view.slip.total_deductions()).sum(),
            slips,
        })
    }

    /// Lists slips newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` for a month outside 1..=12 or a database
    /// error.
    pub async fn list_payroll_slips(&self, filter: SlipFilter) -> StoreResult<Vec<SlipWithStaff>> {
        let mut query = payroll_slips::Entity::find();

        if filter.year.is_some() || filter.month.is_some() {
            query = query.join(JoinType::InnerJoin, payroll_slips::Relation::PayrollRuns.def());
        }
        if let Some(year) = filter.year {
            query = query.filter(payroll_runs::Column::Year.eq(year));
        }
        if let Some(month) = filter.month {
            let invalid = || PayrollError::InvalidPeriod {
                year: filter.year.unwrap_or_default(),
                month,
            };
            if !(1..=12).contains(&month) {
                return Err(invalid().into());
            }
            let month = i32::try_from(month).map_err(|_| invalid())?;
            query = query.filter(payroll_runs::Column::Month.eq(month));
        }
        if let Some(staff_id) = filter.staff_id {
            query = query.filter(payroll_slips::Column::StaffId.eq(staff_id));
        }

        let rows = query
            .find_also_related(staff::Entity)
            .order_by_desc(payroll_slips::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(self.slip_views(rows))
    }

    // ========== Settlement ==========

    /// Confirms a run: posts one accrual entry for all PENDING slips and
    /// marks them and the run PAID.
    ///
    /// The entry debits Salary Expense with `Σ(net + advance)`, credits each
    /// staff payable with its net pay, and credits each ledger holding an
    /// advance with its share of the advance recovered. Zero legs are left
    /// out; a run whose amounts are all zero posts nothing.
    ///
    /// # Errors
    ///
    /// Returns `RunNotFound`, `RunAlreadyPaid`, or a database error.
    pub async fn confirm_payroll_run(&self, year: i32, month: u32) -> StoreResult<SettlementSummary> {
        let period = PayPeriod::new(year, month)?;
        let txn = self.db.begin().await?;

        let run = find_run(&txn, &period)
            .await?
            .ok_or(PayrollError::RunNotFound { year, month })?;
        if run.status == RunStatus::Paid {
            return Err(PayrollError::RunAlreadyPaid { year, month }.into());
        }

        let rows = payroll_slips::Entity::find()
            .filter(payroll_slips::Column::RunId.eq(run.id))
            .filter(payroll_slips::Column::Status.eq(stored::SlipStatus::Pending))
            .find_also_related(staff::Entity)
            .order_by_asc(payroll_slips::Column::CreatedAt)
            .all(&txn)
            .await?;

        let expense = self.salary_expense_in(&txn).await?;
        let mut obligations = Vec::with_capacity(rows.len());
        for (slip, member) in &rows {
            let member = member
                .as_ref()
                .ok_or(PayrollError::StaffNotFound(slip.staff_id))?;
            obligations.push(self.obligation_in(&txn, slip, member).await?);
        }

        let accrual = match SettlementPlanner::batch_accrual(expense.id, &obligations)? {
            Some(plan) => Some(
                self.post_plan_in(&txn, plan, EntryType::Expense, format!("Payroll Run {month}/{year}"))
                    .await?,
            ),
            None => None,
        };

        let mut slip_ids = Vec::with_capacity(rows.len());
        for (slip, _) in rows {
            slip_ids.push(slip.id);
            mark_paid(&txn, slip).await?;
        }

        let mut active: payroll_runs::ActiveModel = run.into();
        active.status = Set(RunStatus::Paid);
        active.processed_at = Set(Some(Utc::now().into()));
        active.update(&txn).await?;

        txn.commit().await?;

        let summary = SettlementSummary {
            slip_ids,
            net_pay: obligations.iter().map(|o| o.net_pay).sum(),
            advance_recovered: obligations.iter().map(|o| o.advance_salary).sum(),
            accrual,
            payment: None,
        };
        info!(
            period = %period.label(),
            slips = summary.slip_ids.len(),
            net_pay = %summary.net_pay,
            advance_recovered = %summary.advance_recovered,
            "Payroll run confirmed"
        );
        Ok(summary)
    }

    /// Settles one slip: posts its accrual and its payment from the bank,
    /// then marks it PAID.
    ///
    /// The bank is the configured bank ledger if present, else the first
    /// active BANK ledger by code, else an internal `MAIN_BANK` ledger.
    ///
    /// # Errors
    ///
    /// Returns `SlipNotFound`, `SlipAlreadyPaid`, or a database error.
    pub async fn process_individual_slip(&self, slip_id: Uuid) -> StoreResult<SettlementSummary> {
        let txn = self.db.begin().await?;

        let slip = find_slip(&txn, slip_id).await?;
        if slip.status == stored::SlipStatus::Paid {
            return Err(PayrollError::SlipAlreadyPaid(slip_id).into());
        }
        let member = find_staff(&txn, slip.staff_id).await?;
        let run = payroll_runs::Entity::find_by_id(slip.run_id)
            .one(&txn)
            .await?
            .ok_or(PayrollError::SlipNotFound(slip_id))?;
        let period = PayPeriod::new(
            run.year,
            u32::try_from(run.month).map_err(|_| PayrollError::InvalidPeriod {
                year: run.year,
                month: 0,
            })?,
        )?;
        let label = period.label();

        let expense = self.salary_expense_in(&txn).await?;
        let obligation = self.obligation_in(&txn, &slip, &member).await?;

        let accrual = match SettlementPlanner::accrual(expense.id, &obligation)? {
            Some(plan) => Some(
                self.post_plan_in(
                    &txn,
                    plan,
                    EntryType::Expense,
                    format!("Payroll Accrual - {label} - {}", member.full_name),
                )
                .await?,
            ),
            None => None,
        };

        let mut payment = None;
        if obligation.net_pay > Decimal::ZERO {
            let bank = self.bank_ledger_in(&txn).await?;
            if let Some(plan) =
                SettlementPlanner::payment(obligation.staff_ledger_id, bank.id, obligation.net_pay)
            {
                payment = Some(
                    self.post_plan_in(
                        &txn,
                        plan,
                        EntryType::Payment,
                        format!("Payroll Payment - {label} - {}", member.full_name),
                    )
                    .await?,
                );
            }
        }

        mark_paid(&txn, slip).await?;
        txn.commit().await?;

        info!(
            slip_id = %slip_id,
            staff_id = %member.id,
            period = %label,
            net_pay = %obligation.net_pay,
            "Payroll slip settled"
        );
        Ok(SettlementSummary {
            slip_ids: vec![slip_id],
            net_pay: obligation.net_pay,
            advance_recovered: obligation.advance_salary,
            accrual,
            payment,
        })
    }

    /// Deletes a PENDING slip.
    ///
    /// # Errors
    ///
    /// Returns `SlipNotFound`, `SlipAlreadyPaid`, or a database error.
    pub async fn reject_individual_slip(&self, slip_id: Uuid) -> StoreResult<()> {
        let txn = self.db.begin().await?;

        let slip = find_slip(&txn, slip_id).await?;
        if slip.status == stored::SlipStatus::Paid {
            return Err(PayrollError::SlipAlreadyPaid(slip_id).into());
        }
        payroll_slips::Entity::delete_by_id(slip_id).exec(&txn).await?;

        txn.commit().await?;
        info!(slip_id = %slip_id, staff_id = %slip.staff_id, "Payroll slip rejected");
        Ok(())
    }

    // ========== Internals ==========

    async fn lop_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        staff_id: Uuid,
        period: &PayPeriod,
        as_of: Option<NaiveDate>,
    ) -> StoreResult<LopBreakdown> {
        let (first, last) = (period.first_day(), period.last_day());

        let attendance: Vec<AttendanceDay> = attendance_records::Entity::find()
            .filter(attendance_records::Column::StaffId.eq(staff_id))
            .filter(attendance_records::Column::AttendanceDate.between(first, last))
            .all(conn)
            .await?
            .into_iter()
            .map(AttendanceDay::from)
            .collect();

        let leaves: Vec<LeaveSpan> = leave_requests::Entity::find()
            .filter(leave_requests::Column::StaffId.eq(staff_id))
            .filter(leave_requests::Column::Status.eq(LeaveStatus::Approved))
            .filter(leave_requests::Column::StartDate.lte(last))
            .filter(leave_requests::Column::EndDate.gte(first))
            .all(conn)
            .await?
            .into_iter()
            .map(LeaveSpan::from)
            .collect();

        let calendar: HolidayCalendar = holidays::Entity::find()
            .filter(
                Condition::any()
                    .add(holidays::Column::Recurring.eq(true))
                    .add(holidays::Column::HolidayDate.between(first, last)),
            )
            .all(conn)
            .await?
            .into_iter()
            .map(|holiday| (holiday.holiday_date, holiday.recurring))
            .collect();

        Ok(LopCalculator::calculate(
            period,
            as_of,
            self.today(),
            &attendance,
            &leaves,
            &calendar,
        ))
    }

    /// Ledgers holding a staff member's outstanding advance, with the
    /// amount each holds.
    ///
    /// Reads the positive balances of their salary advance ledger, their
    /// payable ledger (a debit balance there is an overpayment), and an
    /// expense ledger bound to them, in that order.
    async fn advance_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        member: &staff::Model,
    ) -> StoreResult<Vec<AdvanceShare>> {
        let key = member.id.to_string();
        let candidates = [
            (Some(stored::EntityType::StaffAdvance), HeadCode::Assets),
            (Some(stored::EntityType::Staff), HeadCode::Liabilities),
            (None, HeadCode::Expenses),
        ];

        let mut seen = HashSet::new();
        let mut sources = Vec::with_capacity(candidates.len());
        for (entity_type, head) in candidates {
            let head_id = self.chart.head_id(head)?;

            let mut by_id = ledgers::Entity::find()
                .filter(ledgers::Column::HeadId.eq(head_id))
                .filter(ledgers::Column::EntityId.eq(key.as_str()));
            if let Some(entity_type) = entity_type {
                by_id = by_id.filter(ledgers::Column::EntityType.eq(entity_type));
            }
            let mut ledger = by_id
                .order_by_asc(ledgers::Column::LedgerCode)
                .one(conn)
                .await?;

            if ledger.is_none() && entity_type != Some(stored::EntityType::StaffAdvance) {
                ledger = ledgers::Entity::find()
                    .filter(ledgers::Column::HeadId.eq(head_id))
                    .filter(ledgers::Column::Name.eq(member.full_name.as_str()))
                    .order_by_asc(ledgers::Column::LedgerCode)
                    .one(conn)
                    .await?;
                if let Some(found) = &ledger {
                    warn!(
                        ledger_id = %found.id,
                        staff_id = %member.id,
                        head = %head,
                        "Advance ledger matched by name, verify"
                    );
                }
            }

            if let Some(ledger) = ledger {
                let balance = ledger.balance();
                if seen.insert(ledger.id) && balance > Decimal::ZERO {
                    sources.push(AdvanceShare {
                        ledger_id: ledger.id,
                        amount: balance,
                    });
                }
            }
        }
        Ok(sources)
    }

    #[allow(clippy::too_many_arguments)]
    async fn draft_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        member: &staff::Model,
        period: &PayPeriod,
        payroll_type: PayrollType,
        as_of: Option<NaiveDate>,
        structure: SalaryStructure,
        incentives: Decimal,
        other_deductions: Decimal,
    ) -> StoreResult<(NaiveDate, LopBreakdown, SalaryFigures)> {
        let lop = self.lop_in(conn, member.id, period, as_of).await?;
        let advance_salary: Decimal = self
            .advance_in(conn, member)
            .await?
            .iter()
            .map(|share| share.amount)
            .sum();
        let calculation_date =
            SalaryCalculator::calculation_date(period, payroll_type, as_of, self.today());

        let figures = SalaryCalculator::compute(&SalaryInput {
            structure,
            payroll_type,
            calculation_date,
            lop_days: lop.total_days(),
            advance_salary,
            incentives,
            other_deductions,
        })?;
        Ok((calculation_date, lop, figures))
    }

    fn paid_draft(
        &self,
        member: &staff::Model,
        period: &PayPeriod,
        as_of: Option<NaiveDate>,
        slip: &payroll_slips::Model,
    ) -> SalaryDraft {
        let structure = slip.salary_structure();
        let payroll_type = PayrollType::from(slip.payroll_type);
        SalaryDraft {
            staff_id: member.id,
            staff_name: member.full_name.clone(),
            year: period.year(),
            month: period.month(),
            period: period.label(),
            payroll_type,
            calculation_date: SalaryCalculator::calculation_date(
                period,
                payroll_type,
                as_of,
                self.today(),
            ),
            structure,
            figures: SalaryFigures {
                daily_wage: structure.monthly_fixed() / Decimal::from(PAYROLL_DAY_DIVISOR),
                gross_total: slip.gross_total(),
                total_working_days: u32::try_from(slip.total_working_days).unwrap_or_default(),
                lop_days: slip.lop_days(),
                lop_deduction: slip.lop_deduction(),
                advance_salary: slip.advance_salary(),
                incentives: slip.incentives(),
                other_deductions: slip.other_deductions(),
                net_pay: slip.net_pay(),
            },
            lop: None,
            slip_id: Some(slip.id),
            status: Some(SlipStatus::Paid),
        }
    }

    fn slip_views(&self, rows: Vec<(payroll_slips::Model, Option<staff::Model>)>) -> Vec<SlipWithStaff> {
        rows.into_iter()
            .filter(|(_, member)| !member.as_ref().is_some_and(|m| self.is_exempt(m)))
            .map(|(slip, member)| {
                let (staff_name, staff_number) = member.map_or_else(
                    || ("Unknown".to_string(), None),
                    |m| (m.full_name, m.staff_number),
                );
                SlipWithStaff {
                    slip,
                    staff_name,
                    staff_number,
                }
            })
            .collect()
    }

    async fn salary_expense_in(&self, txn: &DatabaseTransaction) -> StoreResult<ledgers::Model> {
        let request = EnsureLedger::internal(SALARY_EXPENSE_KEY, "Salary Expense", HeadCode::Expenses);
        Ok(ensure_in(txn, &self.chart, &self.sequences, &request).await?.ledger)
    }

    async fn obligation_in(
        &self,
        txn: &DatabaseTransaction,
        slip: &payroll_slips::Model,
        member: &staff::Model,
    ) -> StoreResult<SlipObligation> {
        let payable = EnsureLedger::record(EntityType::Staff, member.id, HeadCode::Liabilities);
        let staff_ledger = ensure_in(txn, &self.chart, &self.sequences, &payable).await?.ledger;

        let mut advance_credits = Vec::new();
        if slip.advance_salary_minor > 0 {
            let sources = self.advance_in(txn, member).await?;
            let (shares, uncovered) =
                SettlementPlanner::allocate_advance(slip.advance_salary(), &sources);
            advance_credits = shares;

            // Balances moved since the slip was saved; the rest goes to the
            // salary advance ledger.
            if uncovered > Decimal::ZERO {
                let request =
                    EnsureLedger::record(EntityType::StaffAdvance, member.id, HeadCode::Assets);
                let ledger = ensure_in(txn, &self.chart, &self.sequences, &request).await?.ledger;
                warn!(
                    slip_id = %slip.id,
                    staff_id = %member.id,
                    uncovered = %uncovered,
                    "Advance on slip exceeds outstanding balance"
                );
                advance_credits.push(AdvanceShare {
                    ledger_id: ledger.id,
                    amount: uncovered,
                });
            }
        }

        Ok(SlipObligation {
            staff_id: member.id,
            staff_ledger_id: staff_ledger.id,
            advance_credits,
            net_pay: slip.net_pay(),
            advance_salary: slip.advance_salary(),
        })
    }

    async fn bank_ledger_in(&self, txn: &DatabaseTransaction) -> StoreResult<ledgers::Model> {
        if let Some(name) = &self.config.bank_ledger_name {
            let configured = ledgers::Entity::find()
                .filter(ledgers::Column::Name.eq(name.as_str()))
                .order_by_asc(ledgers::Column::LedgerCode)
                .one(txn)
                .await?;
            if let Some(ledger) = configured {
                return Ok(ledger);
            }
            warn!(bank_ledger = %name, "Configured bank ledger not found, falling back");
        }

        let first_bank = ledgers::Entity::find()
            .filter(ledgers::Column::EntityType.eq(stored::EntityType::Bank))
            .filter(ledgers::Column::Status.eq(LedgerStatus::Active))
            .order_by_asc(ledgers::Column::LedgerCode)
            .one(txn)
            .await?;
        if let Some(ledger) = first_bank {
            return Ok(ledger);
        }

        let request = EnsureLedger::internal(MAIN_BANK_KEY, "Main Bank A/C", HeadCode::Assets);
        Ok(ensure_in(txn, &self.chart, &self.sequences, &request).await?.ledger)
    }

    async fn post_plan_in(
        &self,
        txn: &DatabaseTransaction,
        plan: PostingPlan,
        entry_type: EntryType,
        description: String,
    ) -> StoreResult<EntryWithLines> {
        post_in(
            txn,
            &self.sequences,
            NewJournalEntry {
                date: self.today(),
                description,
                amount: plan.amount,
                entry_type,
                reference: None,
                nature: EntryNature::General,
                entity_id: None,
                created_by: SYSTEM_USER.to_string(),
                lines: JournalLines::Lines(plan.lines),
            },
        )
        .await
    }
}

/// `(year, month)` as stored on payroll runs.
fn period_key(period: &PayPeriod) -> (i32, i32) {
    // Months are 1..=12.
    (period.year(), i32::try_from(period.month()).unwrap_or_default())
}

async fn find_staff<C: ConnectionTrait>(conn: &C, staff_id: Uuid) -> StoreResult<staff::Model> {
    staff::Entity::find_by_id(staff_id)
        .one(conn)
        .await?
        .ok_or_else(|| PayrollError::StaffNotFound(staff_id).into())
}

async fn find_slip<C: ConnectionTrait>(
    conn: &C,
    slip_id: Uuid,
) -> StoreResult<payroll_slips::Model> {
    payroll_slips::Entity::find_by_id(slip_id)
        .one(conn)
        .await?
        .ok_or_else(|| PayrollError::SlipNotFound(slip_id).into())
}

async fn find_run<C: ConnectionTrait>(
    conn: &C,
    period: &PayPeriod,
) -> StoreResult<Option<payroll_runs::Model>> {
    let (year, month) = period_key(period);
    Ok(payroll_runs::Entity::find()
        .filter(payroll_runs::Column::Year.eq(year))
        .filter(payroll_runs::Column::Month.eq(month))
        .one(conn)
        .await?)
}

async fn find_slip_for_period<C: ConnectionTrait>(
    conn: &C,
    staff_id: Uuid,
    period: &PayPeriod,
) -> StoreResult<Option<payroll_slips::Model>> {
    let (year, month) = period_key(period);
    Ok(payroll_slips::Entity::find()
        .join(JoinType::InnerJoin, payroll_slips::Relation::PayrollRuns.def())
        .filter(payroll_slips::Column::StaffId.eq(staff_id))
        .filter(payroll_runs::Column::Year.eq(year))
        .filter(payroll_runs::Column::Month.eq(month))
        .one(conn)
        .await?)
}

async fn mark_paid(txn: &DatabaseTransaction, slip: payroll_slips::Model) -> StoreResult<()> {
    let now = Utc::now().into();
    let mut active: payroll_slips::ActiveModel = slip.into();
    active.status = Set(stored::SlipStatus::Paid);
    active.paid_at = Set(Some(now));
    active.updated_at = Set(now);
    active.update(txn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_key() {
        let period = PayPeriod::new(2026, 3).unwrap();
        assert_eq!(period_key(&period), (2026, 3));
    }
}
