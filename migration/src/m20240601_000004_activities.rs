//! 活动记录：电话、会议、任务、备注、文档

use sea_orm_migration::prelude::*;

use crate::common::{audit_columns, id_column, named_columns, responsible_column};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut calls = Table::create();
        calls
            .table(PhoneCalls::Table)
            .if_not_exists()
            .col(id_column(PhoneCalls::Id))
            .col(ColumnDef::new(PhoneCalls::Direction).string_len(32).not_null())
            .col(ColumnDef::new(PhoneCalls::Status).string_len(32).not_null())
            .col(
                ColumnDef::new(PhoneCalls::StartAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(PhoneCalls::EndAt)
                    .timestamp_with_time_zone()
                    .null(),
            );
        named_columns(&mut calls);
        related_columns(&mut calls);
        responsible_column(&mut calls, PhoneCalls::Table, "phone_calls");
        audit_columns(&mut calls, PhoneCalls::Table, "phone_calls");
        manager.create_table(calls).await?;

        let mut meetings = Table::create();
        meetings
            .table(Meetings::Table)
            .if_not_exists()
            .col(id_column(Meetings::Id))
            .col(ColumnDef::new(Meetings::Status).string_len(32).not_null())
            .col(ColumnDef::new(Meetings::Location).string_len(255).null())
            .col(
                ColumnDef::new(Meetings::StartAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Meetings::EndAt)
                    .timestamp_with_time_zone()
                    .null(),
            );
        named_columns(&mut meetings);
        related_columns(&mut meetings);
        responsible_column(&mut meetings, Meetings::Table, "meetings");
        audit_columns(&mut meetings, Meetings::Table, "meetings");
        manager.create_table(meetings).await?;

        let mut tasks = Table::create();
        tasks
            .table(Tasks::Table)
            .if_not_exists()
            .col(id_column(Tasks::Id))
            .col(ColumnDef::new(Tasks::Status).string_len(32).not_null())
            .col(ColumnDef::new(Tasks::Priority).string_len(32).not_null())
            .col(
                ColumnDef::new(Tasks::StartAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(ColumnDef::new(Tasks::DueAt).timestamp_with_time_zone().null());
        named_columns(&mut tasks);
        related_columns(&mut tasks);
        responsible_column(&mut tasks, Tasks::Table, "tasks");
        audit_columns(&mut tasks, Tasks::Table, "tasks");
        manager.create_table(tasks).await?;

        let mut notes = Table::create();
        notes
            .table(Notes::Table)
            .if_not_exists()
            .col(id_column(Notes::Id))
            .col(ColumnDef::new(Notes::Attach).string_len(255).null());
        named_columns(&mut notes);
        related_columns(&mut notes);
        audit_columns(&mut notes, Notes::Table, "notes");
        manager.create_table(notes).await?;

        let mut documents = Table::create();
        documents
            .table(Documents::Table)
            .if_not_exists()
            .col(id_column(Documents::Id))
            .col(ColumnDef::new(Documents::Attach).string_len(255).not_null())
            .col(ColumnDef::new(Documents::Version).string_len(32).null())
            .col(ColumnDef::new(Documents::Status).string_len(32).not_null())
            .col(ColumnDef::new(Documents::PublishDate).date().null())
            .col(ColumnDef::new(Documents::ExpirationDate).date().null());
        named_columns(&mut documents);
        responsible_column(&mut documents, Documents::Table, "documents");
        audit_columns(&mut documents, Documents::Table, "documents");
        manager.create_table(documents).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Documents::Table.into_iden(),
            Notes::Table.into_iden(),
            Tasks::Table.into_iden(),
            Meetings::Table.into_iden(),
            PhoneCalls::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

/// 多态关联 related_to：类型 + id，不建外键
fn related_columns(table: &mut TableCreateStatement) {
    table
        .col(ColumnDef::new(Related::RelatedKind).string_len(32).null())
        .col(ColumnDef::new(Related::RelatedId).big_integer().null());
}

#[derive(DeriveIden, Clone, Copy)]
enum Related {
    RelatedKind,
    RelatedId,
}

#[derive(DeriveIden, Clone, Copy)]
enum PhoneCalls {
    Table,
    Id,
    Direction,
    Status,
    StartAt,
    EndAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Meetings {
    Table,
    Id,
    Status,
    Location,
    StartAt,
    EndAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Tasks {
    Table,
    Id,
    Status,
    Priority,
    StartAt,
    DueAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Notes {
    Table,
    Id,
    Attach,
}

#[derive(DeriveIden, Clone, Copy)]
enum Documents {
    Table,
    Id,
    Attach,
    Version,
    Status,
    PublishDate,
    ExpirationDate,
}
