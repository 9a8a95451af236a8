//! Chart of accounts and journal.
//!
//! - `account_heads`: fixed categories
//! - `ledgers`: accounts with their cached debit-positive balance
//! - `journal_entries` / `journal_lines`: balanced postings
//! - `transaction_sequences`: per-month transaction number counters

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountHeads::Table)
                    .if_not_exists()
                    .col(pk_uuid(AccountHeads::Id))
                    .col(string_uniq(AccountHeads::Code))
                    .col(string(AccountHeads::Name))
                    .col(string(AccountHeads::HeadType))
                    .col(timestamp_with_time_zone(AccountHeads::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ledgers::Table)
                    .if_not_exists()
                    .col(pk_uuid(Ledgers::Id))
                    .col(string_uniq(Ledgers::LedgerCode))
                    .col(string(Ledgers::Name))
                    .col(uuid(Ledgers::HeadId))
                    .col(string(Ledgers::EntityType))
                    .col(string_null(Ledgers::EntityId))
                    .col(text_null(Ledgers::Description))
                    .col(big_integer(Ledgers::BalanceMinor).default(0))
                    .col(string(Ledgers::Status).default("ACTIVE"))
                    .col(timestamp_with_time_zone(Ledgers::CreatedAt))
                    .col(timestamp_with_time_zone(Ledgers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledgers_head")
                            .from(Ledgers::Table, Ledgers::HeadId)
                            .to(AccountHeads::Table, AccountHeads::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ledgers_entity")
                    .table(Ledgers::Table)
                    .col(Ledgers::EntityType)
                    .col(Ledgers::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(pk_uuid(JournalEntries::Id))
                    .col(string_uniq(JournalEntries::TransactionNumber))
                    .col(date(JournalEntries::EntryDate))
                    .col(text(JournalEntries::Description))
                    .col(big_integer(JournalEntries::AmountMinor))
                    .col(string(JournalEntries::EntryType))
                    .col(string_null(JournalEntries::Reference))
                    .col(string(JournalEntries::Nature).default("GENERAL"))
                    .col(uuid_null(JournalEntries::EntityId))
                    .col(string(JournalEntries::CreatedBy))
                    .col(timestamp_with_time_zone(JournalEntries::CreatedAt))
                    .col(timestamp_with_time_zone(JournalEntries::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_date")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::EntryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalLines::Table)
                    .if_not_exists()
                    .col(pk_uuid(JournalLines::Id))
                    .col(uuid(JournalLines::EntryId))
                    .col(uuid(JournalLines::LedgerId))
                    .col(integer(JournalLines::LineNo))
                    .col(big_integer(JournalLines::DebitMinor).default(0))
                    .col(big_integer(JournalLines::CreditMinor).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_entry")
                            .from(JournalLines::Table, JournalLines::EntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_ledger")
                            .from(JournalLines::Table, JournalLines::LedgerId)
                            .to(Ledgers::Table, Ledgers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_ledger")
                    .table(JournalLines::Table)
                    .col(JournalLines::LedgerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_entry")
                    .table(JournalLines::Table)
                    .col(JournalLines::EntryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransactionSequences::Table)
                    .if_not_exists()
                    .col(integer(TransactionSequences::Year))
                    .col(integer(TransactionSequences::Month))
                    .col(big_integer(TransactionSequences::LastSeq).default(0))
                    .primary_key(
                        Index::create()
                            .col(TransactionSequences::Year)
                            .col(TransactionSequences::Month),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TransactionSequences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ledgers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountHeads::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AccountHeads {
    Table,
    Id,
    Code,
    Name,
    HeadType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Ledgers {
    Table,
    Id,
    LedgerCode,
    Name,
    HeadId,
    EntityType,
    EntityId,
    Description,
    BalanceMinor,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    TransactionNumber,
    EntryDate,
    Description,
    AmountMinor,
    EntryType,
    Reference,
    Nature,
    EntityId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JournalLines {
    Table,
    Id,
    EntryId,
    LedgerId,
    LineNo,
    DebitMinor,
    CreditMinor,
}

#[derive(DeriveIden)]
enum TransactionSequences {
    Table,
    Year,
    Month,
    LastSeq,
}
