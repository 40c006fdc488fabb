#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::db::connect;

// Migrations run once per test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Database tests are skipped unless `DATABASE_URL` is set and `SKIP_DB_TESTS` is not.
pub fn skip_db() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect().await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<_, anyhow::Error>(())
        })
        .await?;

    // fresh connection bound to the calling test's runtime
    connect().await
}
