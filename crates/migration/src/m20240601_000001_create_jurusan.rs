//! Create `jurusan` (major/department) table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jurusan::Table)
                    .if_not_exists()
                    .col(uuid(Jurusan::Id).primary_key())
                    .col(string_len(Jurusan::Nama, 128).not_null())
                    .col(timestamp_with_time_zone(Jurusan::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Jurusan::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Jurusan { Table, Id, Nama, CreatedAt }
