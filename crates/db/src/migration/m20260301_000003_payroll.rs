//! Attendance inputs, holidays, payroll runs, and slips.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(pk_uuid(AttendanceRecords::Id))
                    .col(uuid(AttendanceRecords::StaffId))
                    .col(date(AttendanceRecords::AttendanceDate))
                    .col(string(AttendanceRecords::Status))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_staff")
                            .from(AttendanceRecords::Table, AttendanceRecords::StaffId)
                            .to(Staff::Table, Staff::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_attendance_staff_date")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::StaffId)
                    .col(AttendanceRecords::AttendanceDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaveRequests::Table)
                    .if_not_exists()
                    .col(pk_uuid(LeaveRequests::Id))
                    .col(uuid(LeaveRequests::StaffId))
                    .col(string(LeaveRequests::LeaveType))
                    .col(string(LeaveRequests::Status))
                    .col(date(LeaveRequests::StartDate))
                    .col(date(LeaveRequests::EndDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_requests_staff")
                            .from(LeaveRequests::Table, LeaveRequests::StaffId)
                            .to(Staff::Table, Staff::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leave_requests_staff")
                    .table(LeaveRequests::Table)
                    .col(LeaveRequests::StaffId)
                    .col(LeaveRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Holidays::Table)
                    .if_not_exists()
                    .col(pk_uuid(Holidays::Id))
                    .col(string(Holidays::Name))
                    .col(date(Holidays::HolidayDate))
                    .col(boolean(Holidays::Recurring).default(false))
                    .col(timestamp_with_time_zone(Holidays::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PayrollRuns::Table)
                    .if_not_exists()
                    .col(pk_uuid(PayrollRuns::Id))
                    .col(integer(PayrollRuns::Year))
                    .col(integer(PayrollRuns::Month))
                    .col(string(PayrollRuns::Status).default("DRAFT"))
                    .col(string(PayrollRuns::PayrollType).default("MONTHLY"))
                    .col(timestamp_with_time_zone_null(PayrollRuns::ProcessedAt))
                    .col(timestamp_with_time_zone(PayrollRuns::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_payroll_runs_period")
                    .table(PayrollRuns::Table)
                    .col(PayrollRuns::Year)
                    .col(PayrollRuns::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PayrollSlips::Table)
                    .if_not_exists()
                    .col(pk_uuid(PayrollSlips::Id))
                    .col(uuid(PayrollSlips::RunId))
                    .col(uuid(PayrollSlips::StaffId))
                    .col(big_integer(PayrollSlips::BasicMinor).default(0))
                    .col(big_integer(PayrollSlips::HraMinor).default(0))
                    .col(big_integer(PayrollSlips::ConveyanceMinor).default(0))
                    .col(big_integer(PayrollSlips::AccommodationMinor).default(0))
                    .col(big_integer(PayrollSlips::AllowancesMinor).default(0))
                    .col(big_integer(PayrollSlips::IncentivesMinor).default(0))
                    .col(integer(PayrollSlips::LopHalfDays).default(0))
                    .col(big_integer(PayrollSlips::LopDeductionMinor).default(0))
                    .col(big_integer(PayrollSlips::AdvanceSalaryMinor).default(0))
                    .col(big_integer(PayrollSlips::OtherDeductionsMinor).default(0))
                    .col(big_integer(PayrollSlips::GrossTotalMinor).default(0))
                    .col(big_integer(PayrollSlips::NetPayMinor).default(0))
                    .col(integer(PayrollSlips::TotalWorkingDays).default(30))
                    .col(string(PayrollSlips::PayrollType).default("MONTHLY"))
                    .col(string(PayrollSlips::Status).default("PENDING"))
                    .col(timestamp_with_time_zone_null(PayrollSlips::PaidAt))
                    .col(timestamp_with_time_zone(PayrollSlips::CreatedAt))
                    .col(timestamp_with_time_zone(PayrollSlips::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payroll_slips_run")
                            .from(PayrollSlips::Table, PayrollSlips::RunId)
                            .to(PayrollRuns::Table, PayrollRuns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payroll_slips_staff")
                            .from(PayrollSlips::Table, PayrollSlips::StaffId)
                            .to(Staff::Table, Staff::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_payroll_slips_run_staff")
                    .table(PayrollSlips::Table)
                    .col(PayrollSlips::RunId)
                    .col(PayrollSlips::StaffId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PayrollSlips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PayrollRuns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Holidays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeaveRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Staff {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AttendanceRecords {
    Table,
    Id,
    StaffId,
    AttendanceDate,
    Status,
}

#[derive(DeriveIden)]
enum LeaveRequests {
    Table,
    Id,
    StaffId,
    LeaveType,
    Status,
    StartDate,
    EndDate,
}

#[derive(DeriveIden)]
enum Holidays {
    Table,
    Id,
    Name,
    HolidayDate,
    Recurring,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PayrollRuns {
    Table,
    Id,
    Year,
    Month,
    Status,
    PayrollType,
    ProcessedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PayrollSlips {
    Table,
    Id,
    RunId,
    StaffId,
    BasicMinor,
    HraMinor,
    ConveyanceMinor,
    AccommodationMinor,
    AllowancesMinor,
    IncentivesMinor,
    LopHalfDays,
    LopDeductionMinor,
    AdvanceSalaryMinor,
    OtherDeductionsMinor,
    GrossTotalMinor,
    NetPayMinor,
    TotalWorkingDays,
    PayrollType,
    Status,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}
