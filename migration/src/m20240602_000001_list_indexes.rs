//! 管理列表常用的过滤/排序列索引

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, &str, &str)] = &[
    ("idx_contractors_name", "contractors", "name"),
    ("idx_contractors_parent_id", "contractors", "parent_id"),
    ("idx_contacts_last_name", "contacts", "last_name"),
    ("idx_contacts_contractor_id", "contacts", "contractor_id"),
    ("idx_contacts_head_id", "contacts", "head_id"),
    ("idx_deals_stage", "deals", "stage"),
    ("idx_deals_contractor_id", "deals", "contractor_id"),
    ("idx_circulations_status", "circulations", "status"),
    ("idx_tasks_status", "tasks", "status"),
    ("idx_tasks_due_at", "tasks", "due_at"),
    ("idx_documents_status", "documents", "status"),
    ("idx_projects_status", "projects", "status"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, column) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(*name)
                        .table(Alias::new(*table))
                        .col(Alias::new(*column))
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(
                    Index::drop()
                        .if_exists()
                        .name(*name)
                        .table(Alias::new(*table))
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
