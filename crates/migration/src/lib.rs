//! Migrator for the alumni schema. Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_jurusan;
mod m20240601_000002_create_alumni;
mod m20240601_000003_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_jurusan::Migration),
            Box::new(m20240601_000002_create_alumni::Migration),
            Box::new(m20240601_000003_add_indexes::Migration),
        ]
    }
}
