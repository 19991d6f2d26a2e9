//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bv-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BV_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use thiserror::Error;

use barrel_verse_api::storage;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// No database connection string configured.
    #[error("Missing environment variable: BV_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending application migrations.
///
/// # Errors
///
/// Returns [`MigrationError`] if no database is configured, the connection
/// fails, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = super::database_url().ok_or(MigrationError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = storage::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    storage::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
