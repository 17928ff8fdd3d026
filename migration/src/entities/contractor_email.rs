//! Join table: `contractor_emails`

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "contractor_emails")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub contractor_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub email_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
