//! 迁移之间共享的表标识和列辅助函数

use sea_orm_migration::prelude::*;

#[derive(DeriveIden, Clone, Copy)]
pub enum Users {
    Table,
    Id,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Addresses {
    Table,
    Id,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum EmailContacts {
    Table,
    Id,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum MarketingCampaigns {
    Table,
    Id,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Contractors {
    Table,
    Id,
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Contacts {
    Table,
    Id,
}

#[derive(DeriveIden, Clone, Copy)]
enum Audit {
    CreatedBy,
    CreatedAt,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Common {
    Name,
    Description,
    ResponsibleId,
}

/// 自增 big integer 主键
pub fn id_column<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// 名称 + 描述两列（Named / Desc）
pub fn named_columns(table: &mut TableCreateStatement) {
    table
        .col(ColumnDef::new(Common::Name).string_len(255).not_null())
        .col(
            ColumnDef::new(Common::Description)
                .text()
                .not_null()
                .default(""),
        );
}

/// 仅描述列（Desc）
pub fn description_column(table: &mut TableCreateStatement) {
    table.col(
        ColumnDef::new(Common::Description)
            .text()
            .not_null()
            .default(""),
    );
}

/// 负责人列，用户删除时置空
pub fn responsible_column<T: IntoIden + Copy + 'static>(
    table: &mut TableCreateStatement,
    owner: T,
    prefix: &str,
) {
    table
        .col(ColumnDef::new(Common::ResponsibleId).big_integer().null())
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{}_responsible", prefix))
                .from(owner, Common::ResponsibleId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::SetNull),
        );
}

/// 审计四列：created_by / created_at / updated_by / updated_at
///
/// 用户被引用时不允许删除（RESTRICT）。
pub fn audit_columns<T: IntoIden + Copy + 'static>(
    table: &mut TableCreateStatement,
    owner: T,
    prefix: &str,
) {
    table
        .col(ColumnDef::new(Audit::CreatedBy).big_integer().not_null())
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Audit::UpdatedBy).big_integer().not_null())
        .col(
            ColumnDef::new(Audit::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{}_created_by", prefix))
                .from(owner, Audit::CreatedBy)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{}_updated_by", prefix))
                .from(owner, Audit::UpdatedBy)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Restrict),
        );
}

/// 可空外键列 + 约束
pub fn optional_reference<T, C, R, RC>(
    table: &mut TableCreateStatement,
    owner: T,
    column: C,
    target: R,
    target_column: RC,
    name: &str,
    on_delete: ForeignKeyAction,
) where
    T: IntoIden + Copy + 'static,
    C: IntoIden + Copy + 'static,
    R: IntoIden + Copy + 'static,
    RC: IntoIden + Copy + 'static,
{
    table
        .col(ColumnDef::new(column).big_integer().null())
        .foreign_key(
            ForeignKey::create()
                .name(name)
                .from(owner, column)
                .to(target, target_column)
                .on_delete(on_delete),
        );
}

/// 必填外键列 + 约束
pub fn required_reference<T, C, R, RC>(
    table: &mut TableCreateStatement,
    owner: T,
    column: C,
    target: R,
    target_column: RC,
    name: &str,
    on_delete: ForeignKeyAction,
) where
    T: IntoIden + Copy + 'static,
    C: IntoIden + Copy + 'static,
    R: IntoIden + Copy + 'static,
    RC: IntoIden + Copy + 'static,
{
    table
        .col(ColumnDef::new(column).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .name(name)
                .from(owner, column)
                .to(target, target_column)
                .on_delete(on_delete),
        );
}
