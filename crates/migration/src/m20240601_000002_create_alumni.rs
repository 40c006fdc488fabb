//! Create `alumni` table with nullable FK to `jurusan`.
//!
//! `email` is intentionally not unique at the schema level.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alumni::Table)
                    .if_not_exists()
                    .col(uuid(Alumni::Id).primary_key())
                    .col(ColumnDef::new(Alumni::JurusanId).uuid().null())
                    .col(string_len(Alumni::Nama, 255).not_null())
                    .col(string_len(Alumni::Email, 255).not_null())
                    .col(ColumnDef::new(Alumni::Password).string_len(255).null())
                    .col(ColumnDef::new(Alumni::TempatKerja).string_len(255).null())
                    .col(ColumnDef::new(Alumni::JabatanKerja).string_len(255).null())
                    .col(ColumnDef::new(Alumni::TempatKuliah).string_len(255).null())
                    .col(ColumnDef::new(Alumni::ProdiKuliah).string_len(255).null())
                    .col(integer(Alumni::TahunMulai).not_null())
                    .col(integer(Alumni::TahunLulus).not_null())
                    .col(boolean(Alumni::KesesuaianKerja).not_null().default(false))
                    .col(boolean(Alumni::KesesuaianKuliah).not_null().default(false))
                    .col(timestamp_with_time_zone(Alumni::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Alumni::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alumni_jurusan")
                            .from(Alumni::Table, Alumni::JurusanId)
                            .to(Jurusan::Table, Jurusan::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Alumni::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Alumni {
    Table,
    Id,
    JurusanId,
    Nama,
    Email,
    Password,
    TempatKerja,
    JabatanKerja,
    TempatKuliah,
    ProdiKuliah,
    TahunMulai,
    TahunLulus,
    KesesuaianKerja,
    KesesuaianKuliah,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Jurusan { Table, Id }
