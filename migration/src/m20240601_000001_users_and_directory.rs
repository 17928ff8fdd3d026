//! 用户、地址、邮箱与营销活动
//!
//! 这些表是其余所有表的外键目标，必须最先创建。

use sea_orm_migration::prelude::*;

use crate::common::{
    Addresses, EmailContacts, MarketingCampaigns, Users, audit_columns, description_column,
    id_column, named_columns, responsible_column,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_column(Users::Id))
                    .col(
                        ColumnDef::new(UserCols::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(UserCols::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(UserCols::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(UserCols::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        let mut addresses = Table::create();
        addresses
            .table(Addresses::Table)
            .if_not_exists()
            .col(id_column(Addresses::Id))
            .col(ColumnDef::new(AddressCols::Street).text().not_null())
            .col(ColumnDef::new(AddressCols::City).string_len(128).not_null())
            .col(ColumnDef::new(AddressCols::Region).string_len(128).not_null())
            .col(ColumnDef::new(AddressCols::Zipcode).string_len(16).not_null())
            .col(ColumnDef::new(AddressCols::Country).string_len(128).not_null())
            .col(ColumnDef::new(AddressCols::Latitude).double().null())
            .col(ColumnDef::new(AddressCols::Longitude).double().null());
        description_column(&mut addresses);
        audit_columns(&mut addresses, Addresses::Table, "addresses");
        manager.create_table(addresses).await?;

        let mut emails = Table::create();
        emails
            .table(EmailContacts::Table)
            .if_not_exists()
            .col(id_column(EmailContacts::Id))
            .col(ColumnDef::new(EmailCols::Email).string_len(254).not_null())
            .col(
                ColumnDef::new(EmailCols::DoNotContact)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(EmailCols::Invalid)
                    .boolean()
                    .not_null()
                    .default(false),
            );
        audit_columns(&mut emails, EmailContacts::Table, "email_contacts");
        manager.create_table(emails).await?;

        let mut campaigns = Table::create();
        campaigns
            .table(MarketingCampaigns::Table)
            .if_not_exists()
            .col(id_column(MarketingCampaigns::Id))
            .col(ColumnDef::new(CampaignCols::Status).string_len(32).not_null())
            .col(ColumnDef::new(CampaignCols::Kind).string_len(32).not_null())
            .col(ColumnDef::new(CampaignCols::StartDate).date().null())
            .col(ColumnDef::new(CampaignCols::EndDate).date().null())
            .col(ColumnDef::new(CampaignCols::Budget).double().null())
            .col(ColumnDef::new(CampaignCols::ExpectedCost).double().null())
            .col(ColumnDef::new(CampaignCols::ActualCost).double().null())
            .col(ColumnDef::new(CampaignCols::ExpectedRevenue).double().null());
        named_columns(&mut campaigns);
        responsible_column(&mut campaigns, MarketingCampaigns::Table, "campaigns");
        audit_columns(&mut campaigns, MarketingCampaigns::Table, "campaigns");
        manager.create_table(campaigns).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_email_contacts_email")
                    .table(EmailContacts::Table)
                    .col(EmailCols::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_email_contacts_email").to_owned())
            .await?;

        for table in [
            MarketingCampaigns::Table.into_iden(),
            EmailContacts::Table.into_iden(),
            Addresses::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserCols {
    Username,
    PasswordHash,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AddressCols {
    Street,
    City,
    Region,
    Zipcode,
    Country,
    Latitude,
    Longitude,
}

#[derive(DeriveIden)]
enum EmailCols {
    Email,
    DoNotContact,
    Invalid,
}

#[derive(DeriveIden)]
enum CampaignCols {
    Status,
    Kind,
    StartDate,
    EndDate,
    Budget,
    ExpectedCost,
    ActualCost,
    ExpectedRevenue,
}
