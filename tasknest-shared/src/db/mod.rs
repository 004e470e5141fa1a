/// Database layer for TaskNest
///
/// This module provides the connection pool and the migration runner.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup connectivity probe
/// - `migrations`: embedded sqlx migrations, applied at startup
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::db::{
///     migrations::run_migrations,
///     pool::{create_pool, DatabaseConfig},
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     })
///     .await?;
///
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
