//! Database migration commands.
//!
//! # Environment Variables
//!
//! - `RECIPE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Application migrations live in `crates/web/migrations/`. The session
//! table is owned by `tower-sessions-sqlx-store` and created by its own
//! migration.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors from the migrate command.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

fn database_url() -> Result<SecretString, MigrationError> {
    std::env::var("RECIPE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("RECIPE_DATABASE_URL"))
}

/// Connect to the site database.
///
/// # Errors
///
/// Returns an error if the URL is missing or the connection fails.
pub async fn connect() -> Result<PgPool, MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(database_url.expose_secret()).await?)
}

/// Run the application migrations.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn users(pool: &PgPool) -> Result<(), MigrationError> {
    tracing::info!("Running application migrations...");
    sqlx::migrate!("../web/migrations").run(pool).await?;
    tracing::info!("Application migrations complete");
    Ok(())
}

/// Create the session store schema.
///
/// # Errors
///
/// Returns an error if the schema cannot be created.
pub async fn sessions(pool: &PgPool) -> Result<(), MigrationError> {
    tracing::info!("Creating session store schema...");
    PostgresStore::new(pool.clone()).migrate().await?;
    tracing::info!("Session store ready");
    Ok(())
}
