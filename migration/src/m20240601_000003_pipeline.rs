//! 销售管道：商机、工单、项目

use sea_orm_migration::prelude::*;

use crate::common::{
    Contractors, MarketingCampaigns, audit_columns, id_column, named_columns, optional_reference,
    required_reference, responsible_column,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut deals = Table::create();
        deals
            .table(Deals::Table)
            .if_not_exists()
            .col(id_column(Deals::Id))
            .col(ColumnDef::new(Deals::Amount).double().not_null())
            .col(ColumnDef::new(Deals::Stage).string_len(32).not_null())
            .col(ColumnDef::new(Deals::Probability).integer().null())
            .col(ColumnDef::new(Deals::ClosingDate).date().null())
            .col(ColumnDef::new(Deals::NextStep).string_len(255).null())
            .col(ColumnDef::new(Deals::Source).string_len(32).null());
        named_columns(&mut deals);
        required_reference(
            &mut deals,
            Deals::Table,
            Deals::ContractorId,
            Contractors::Table,
            Contractors::Id,
            "fk_deals_contractor",
            ForeignKeyAction::Cascade,
        );
        optional_reference(
            &mut deals,
            Deals::Table,
            Deals::CampaignId,
            MarketingCampaigns::Table,
            MarketingCampaigns::Id,
            "fk_deals_campaign",
            ForeignKeyAction::SetNull,
        );
        responsible_column(&mut deals, Deals::Table, "deals");
        audit_columns(&mut deals, Deals::Table, "deals");
        manager.create_table(deals).await?;

        let mut circulations = Table::create();
        circulations
            .table(Circulations::Table)
            .if_not_exists()
            .col(id_column(Circulations::Id))
            .col(ColumnDef::new(Circulations::Priority).string_len(32).not_null())
            .col(ColumnDef::new(Circulations::Status).string_len(32).not_null())
            .col(ColumnDef::new(Circulations::Kind).string_len(32).not_null())
            .col(ColumnDef::new(Circulations::Resolution).text().null());
        named_columns(&mut circulations);
        required_reference(
            &mut circulations,
            Circulations::Table,
            Circulations::ContractorId,
            Contractors::Table,
            Contractors::Id,
            "fk_circulations_contractor",
            ForeignKeyAction::Cascade,
        );
        responsible_column(&mut circulations, Circulations::Table, "circulations");
        audit_columns(&mut circulations, Circulations::Table, "circulations");
        manager.create_table(circulations).await?;

        let mut projects = Table::create();
        projects
            .table(Projects::Table)
            .if_not_exists()
            .col(id_column(Projects::Id))
            .col(ColumnDef::new(Projects::Status).string_len(32).not_null())
            .col(ColumnDef::new(Projects::Priority).string_len(32).null())
            .col(ColumnDef::new(Projects::StartDate).date().null())
            .col(ColumnDef::new(Projects::EndDate).date().null());
        named_columns(&mut projects);
        optional_reference(
            &mut projects,
            Projects::Table,
            Projects::ContractorId,
            Contractors::Table,
            Contractors::Id,
            "fk_projects_contractor",
            ForeignKeyAction::SetNull,
        );
        responsible_column(&mut projects, Projects::Table, "projects");
        audit_columns(&mut projects, Projects::Table, "projects");
        manager.create_table(projects).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Projects::Table.into_iden(),
            Circulations::Table.into_iden(),
            Deals::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Deals {
    Table,
    Id,
    ContractorId,
    CampaignId,
    Amount,
    Stage,
    Probability,
    ClosingDate,
    NextStep,
    Source,
}

#[derive(DeriveIden, Clone, Copy)]
enum Circulations {
    Table,
    Id,
    ContractorId,
    Priority,
    Status,
    Kind,
    Resolution,
}

#[derive(DeriveIden, Clone, Copy)]
enum Projects {
    Table,
    Id,
    ContractorId,
    Status,
    Priority,
    StartDate,
    EndDate,
}
