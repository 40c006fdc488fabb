use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Email existence check
        manager
            .create_index(
                Index::create()
                    .name("idx_alumni_email")
                    .table(Alumni::Table)
                    .col(Alumni::Email)
                    .to_owned(),
            )
            .await?;

        // Year filters on listing and chart
        manager
            .create_index(
                Index::create()
                    .name("idx_alumni_tahun_lulus")
                    .table(Alumni::Table)
                    .col(Alumni::TahunLulus)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_alumni_tahun_mulai")
                    .table(Alumni::Table)
                    .col(Alumni::TahunMulai)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alumni_jurusan")
                    .table(Alumni::Table)
                    .col(Alumni::JurusanId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_alumni_email", "idx_alumni_tahun_lulus", "idx_alumni_tahun_mulai", "idx_alumni_jurusan"] {
            manager
                .drop_index(Index::drop().name(name).table(Alumni::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Alumni { Table, Email, TahunLulus, TahunMulai, JurusanId }
