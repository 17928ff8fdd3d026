use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub salutation: Option<String>,
    pub first_name: Option<String>,
    pub last_name: String,
    pub role: Option<String>,
    pub department: Option<String>,
    pub phone_work: Option<String>,
    pub phone_mobile: Option<String>,
    pub phone_home: Option<String>,
    pub fax: Option<String>,
    pub skype: Option<String>,
    pub birthday: Option<Date>,
    pub source: Option<String>,
    pub contractor_id: Option<i64>,
    /// 直属上级（reports to）
    pub head_id: Option<i64>,
    pub campaign_id: Option<i64>,
    pub responsible_id: Option<i64>,
    pub primary_address_id: Option<i64>,
    pub primary_email_id: Option<i64>,
    pub created_by: i64,
    pub created_at: DateTimeUtc,
    pub updated_by: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
