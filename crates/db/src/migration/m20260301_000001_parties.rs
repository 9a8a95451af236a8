//! Clients and staff.
//!
//! Owned by other modules of the business; the ledger reads their names
//! and salary components and moves their advance counters.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(pk_uuid(Clients::Id))
                    .col(string(Clients::Name))
                    .col(big_integer(Clients::AdvanceBalanceMinor).default(0))
                    .col(timestamp_with_time_zone(Clients::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(pk_uuid(Staff::Id))
                    .col(string(Staff::FullName))
                    .col(string_null(Staff::StaffNumber))
                    .col(big_integer(Staff::BasicMinor).default(0))
                    .col(big_integer(Staff::HraMinor).default(0))
                    .col(big_integer(Staff::ConveyanceMinor).default(0))
                    .col(big_integer(Staff::AccommodationMinor).default(0))
                    .col(big_integer(Staff::AllowancesMinor).default(0))
                    .col(big_integer(Staff::AdvanceBalanceMinor).default(0))
                    .col(timestamp_with_time_zone(Staff::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_staff_number")
                    .table(Staff::Table)
                    .col(Staff::StaffNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    Name,
    AdvanceBalanceMinor,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Staff {
    Table,
    Id,
    FullName,
    StaffNumber,
    BasicMinor,
    HraMinor,
    ConveyanceMinor,
    AccommodationMinor,
    AllowancesMinor,
    AdvanceBalanceMinor,
    CreatedAt,
}
