/// Database migrations
///
/// Migration files live in the `migrations/` directory at the crate root
/// and are embedded into the binary at compile time with `sqlx::migrate!`,
/// so a deployed server carries its own schema history.

use sqlx::{migrate::MigrateDatabase, PgPool, Postgres};
use tracing::info;

/// Applies any pending migrations
///
/// Already-applied migrations are skipped, so this runs unconditionally at
/// every startup.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or an applied
/// migration's checksum no longer matches its file.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Applying database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}

/// Creates the database if it doesn't exist
///
/// A development convenience; production databases are provisioned ahead
/// of time and this becomes a no-op.
///
/// # Errors
///
/// Returns an error if the PostgreSQL server is unreachable or database
/// creation fails.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }
    Ok(())
}
