use arena_migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::env;

/// Connects to `DATABASE_URL` and applies pending migrations. Returns
/// `None` when the variable is unset.
pub async fn init_pool_and_migrate() -> anyhow::Result<Option<DatabaseConnection>> {
    let Ok(database_url) = env::var("DATABASE_URL") else {
        return Ok(None);
    };

    let db = Database::connect(&database_url).await?;

    Migrator::up(&db, None).await?;

    Ok(Some(db))
}
