use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contractors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub phone: String,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub kind: Option<String>,
    pub rating: Option<String>,
    pub annual_revenue: Option<f64>,
    pub employees: Option<i32>,
    pub source: Option<String>,
    pub parent_id: Option<i64>,
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
