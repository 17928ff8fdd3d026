pub use sea_orm_migration::prelude::*;

mod common;
pub mod entities;
mod m20240601_000001_users_and_directory;
mod m20240601_000002_contractors_and_contacts;
mod m20240601_000003_pipeline;
mod m20240601_000004_activities;
mod m20240602_000001_list_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_users_and_directory::Migration),
            Box::new(m20240601_000002_contractors_and_contacts::Migration),
            Box::new(m20240601_000003_pipeline::Migration),
            Box::new(m20240601_000004_activities::Migration),
            Box::new(m20240602_000001_list_indexes::Migration),
        ]
    }
}
