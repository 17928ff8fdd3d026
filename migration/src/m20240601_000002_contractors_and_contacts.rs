//! 客户单位、联系人及其地址/邮箱关联表

use sea_orm_migration::prelude::*;

use crate::common::{
    Addresses, Contacts, Contractors, EmailContacts, MarketingCampaigns, audit_columns,
    description_column, id_column, named_columns, optional_reference, responsible_column,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut contractors = Table::create();
        contractors
            .table(Contractors::Table)
            .if_not_exists()
            .col(id_column(Contractors::Id))
            .col(ColumnDef::new(ContractorCols::Phone).string_len(128).not_null())
            .col(ColumnDef::new(ContractorCols::Fax).string_len(128).null())
            .col(ColumnDef::new(ContractorCols::Website).string_len(200).null())
            .col(ColumnDef::new(ContractorCols::Industry).string_len(32).null())
            .col(ColumnDef::new(ContractorCols::Kind).string_len(32).null())
            .col(ColumnDef::new(ContractorCols::Rating).string_len(32).null())
            .col(ColumnDef::new(ContractorCols::AnnualRevenue).double().null())
            .col(ColumnDef::new(ContractorCols::Employees).integer().null())
            .col(ColumnDef::new(ContractorCols::Source).string_len(32).null());
        named_columns(&mut contractors);
        optional_reference(
            &mut contractors,
            Contractors::Table,
            ContractorCols::ParentId,
            Contractors::Table,
            Contractors::Id,
            "fk_contractors_parent",
            ForeignKeyAction::SetNull,
        );
        optional_reference(
            &mut contractors,
            Contractors::Table,
            ContractorCols::CampaignId,
            MarketingCampaigns::Table,
            MarketingCampaigns::Id,
            "fk_contractors_campaign",
            ForeignKeyAction::SetNull,
        );
        optional_reference(
            &mut contractors,
            Contractors::Table,
            ContractorCols::PrimaryAddressId,
            Addresses::Table,
            Addresses::Id,
            "fk_contractors_primary_address",
            ForeignKeyAction::SetNull,
        );
        optional_reference(
            &mut contractors,
            Contractors::Table,
            ContractorCols::PrimaryEmailId,
            EmailContacts::Table,
            EmailContacts::Id,
            "fk_contractors_primary_email",
            ForeignKeyAction::SetNull,
        );
        responsible_column(&mut contractors, Contractors::Table, "contractors");
        audit_columns(&mut contractors, Contractors::Table, "contractors");
        manager.create_table(contractors).await?;

        let mut contacts = Table::create();
        contacts
            .table(Contacts::Table)
            .if_not_exists()
            .col(id_column(Contacts::Id))
            .col(ColumnDef::new(ContactCols::Salutation).string_len(16).null())
            .col(ColumnDef::new(ContactCols::FirstName).string_len(64).null())
            .col(ColumnDef::new(ContactCols::LastName).string_len(64).not_null())
            .col(ColumnDef::new(ContactCols::Role).string_len(128).null())
            .col(ColumnDef::new(ContactCols::Department).string_len(128).null())
            .col(ColumnDef::new(ContactCols::PhoneWork).string_len(128).null())
            .col(ColumnDef::new(ContactCols::PhoneMobile).string_len(128).null())
            .col(ColumnDef::new(ContactCols::PhoneHome).string_len(128).null())
            .col(ColumnDef::new(ContactCols::Fax).string_len(128).null())
            .col(ColumnDef::new(ContactCols::Skype).string_len(64).null())
            .col(ColumnDef::new(ContactCols::Birthday).date().null())
            .col(ColumnDef::new(ContactCols::Source).string_len(32).null());
        description_column(&mut contacts);
        optional_reference(
            &mut contacts,
            Contacts::Table,
            ContactCols::ContractorId,
            Contractors::Table,
            Contractors::Id,
            "fk_contacts_contractor",
            ForeignKeyAction::SetNull,
        );
        optional_reference(
            &mut contacts,
            Contacts::Table,
            ContactCols::HeadId,
            Contacts::Table,
            Contacts::Id,
            "fk_contacts_head",
            ForeignKeyAction::SetNull,
        );
        optional_reference(
            &mut contacts,
            Contacts::Table,
            ContactCols::CampaignId,
            MarketingCampaigns::Table,
            MarketingCampaigns::Id,
            "fk_contacts_campaign",
            ForeignKeyAction::SetNull,
        );
        optional_reference(
            &mut contacts,
            Contacts::Table,
            ContactCols::PrimaryAddressId,
            Addresses::Table,
            Addresses::Id,
            "fk_contacts_primary_address",
            ForeignKeyAction::SetNull,
        );
        optional_reference(
            &mut contacts,
            Contacts::Table,
            ContactCols::PrimaryEmailId,
            EmailContacts::Table,
            EmailContacts::Id,
            "fk_contacts_primary_email",
            ForeignKeyAction::SetNull,
        );
        responsible_column(&mut contacts, Contacts::Table, "contacts");
        audit_columns(&mut contacts, Contacts::Table, "contacts");
        manager.create_table(contacts).await?;

        manager
            .create_table(
                Table::create()
                    .table(PreliminaryContacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PreliminaryContacts::ContactId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PreliminaryContacts::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PreliminaryContacts::EstimatedAmount)
                            .double()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_preliminary_contacts_contact")
                            .from(PreliminaryContacts::Table, PreliminaryContacts::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        create_join_table(
            manager,
            JoinTable::ContractorAddresses,
            "contractor_addresses",
            JoinCols::ContractorId,
            Contractors::Table,
            Contractors::Id,
            JoinCols::AddressId,
            Addresses::Table,
            Addresses::Id,
        )
        .await?;
        create_join_table(
            manager,
            JoinTable::ContractorEmails,
            "contractor_emails",
            JoinCols::ContractorId,
            Contractors::Table,
            Contractors::Id,
            JoinCols::EmailId,
            EmailContacts::Table,
            EmailContacts::Id,
        )
        .await?;
        create_join_table(
            manager,
            JoinTable::ContactAddresses,
            "contact_addresses",
            JoinCols::ContactId,
            Contacts::Table,
            Contacts::Id,
            JoinCols::AddressId,
            Addresses::Table,
            Addresses::Id,
        )
        .await?;
        create_join_table(
            manager,
            JoinTable::ContactEmails,
            "contact_emails",
            JoinCols::ContactId,
            Contacts::Table,
            Contacts::Id,
            JoinCols::EmailId,
            EmailContacts::Table,
            EmailContacts::Id,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            JoinTable::ContactEmails.into_iden(),
            JoinTable::ContactAddresses.into_iden(),
            JoinTable::ContractorEmails.into_iden(),
            JoinTable::ContractorAddresses.into_iden(),
            PreliminaryContacts::Table.into_iden(),
            Contacts::Table.into_iden(),
            Contractors::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

/// 多对多关联表：两侧删除时都级联删除关联行
#[allow(clippy::too_many_arguments)]
async fn create_join_table(
    manager: &SchemaManager<'_>,
    table: JoinTable,
    prefix: &str,
    owner_col: JoinCols,
    owner_table: impl IntoIden + Copy + 'static,
    owner_id: impl IntoIden + Copy + 'static,
    target_col: JoinCols,
    target_table: impl IntoIden + Copy + 'static,
    target_id: impl IntoIden + Copy + 'static,
) -> Result<(), DbErr> {
    manager
        .create_table(
            Table::create()
                .table(table)
                .if_not_exists()
                .col(ColumnDef::new(owner_col).big_integer().not_null())
                .col(ColumnDef::new(target_col).big_integer().not_null())
                .primary_key(Index::create().col(owner_col).col(target_col))
                .foreign_key(
                    ForeignKey::create()
                        .name(format!("fk_{}_owner", prefix))
                        .from(table, owner_col)
                        .to(owner_table, owner_id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name(format!("fk_{}_target", prefix))
                        .from(table, target_col)
                        .to(target_table, target_id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await
}

#[derive(DeriveIden, Clone, Copy)]
enum JoinTable {
    ContractorAddresses,
    ContractorEmails,
    ContactAddresses,
    ContactEmails,
}

#[derive(DeriveIden, Clone, Copy)]
enum JoinCols {
    ContractorId,
    ContactId,
    AddressId,
    EmailId,
}

#[derive(DeriveIden, Clone, Copy)]
enum ContractorCols {
    Phone,
    Fax,
    Website,
    Industry,
    Kind,
    Rating,
    AnnualRevenue,
    Employees,
    Source,
    ParentId,
    CampaignId,
    PrimaryAddressId,
    PrimaryEmailId,
}

#[derive(DeriveIden, Clone, Copy)]
enum ContactCols {
    Salutation,
    FirstName,
    LastName,
    Role,
    Department,
    PhoneWork,
    PhoneMobile,
    PhoneHome,
    Fax,
    Skype,
    Birthday,
    Source,
    ContractorId,
    HeadId,
    CampaignId,
    PrimaryAddressId,
    PrimaryEmailId,
}

#[derive(DeriveIden, Clone, Copy)]
enum PreliminaryContacts {
    Table,
    ContactId,
    Status,
    EstimatedAmount,
}
