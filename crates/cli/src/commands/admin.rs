//! Admin flag management commands.
//!
//! # Usage
//!
//! ```bash
//! bv-cli admin grant -e owner@example.com
//! bv-cli admin revoke -e owner@example.com
//! ```
//!
//! The user must already exist (register through the API first). This is
//! the only path to admin access.
//!
//! # Environment Variables
//!
//! - `BV_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use thiserror::Error;

use barrel_verse_api::storage::{self, PgStorage, Storage, StorageError};
use barrel_verse_core::{Email, EmailError};

/// Errors that can occur during admin flag operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No database connection string configured.
    #[error("Missing environment variable: BV_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No user with that email.
    #[error("No user found with email: {0}")]
    UserNotFound(String),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Set a user's admin flag by email.
///
/// # Errors
///
/// Returns [`AdminError`] if the email is malformed, the user does not
/// exist, or the database is unreachable.
pub async fn set_admin(email: &str, is_admin: bool) -> Result<(), AdminError> {
    let email = Email::parse(email)?;

    let database_url = super::database_url().ok_or(AdminError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = storage::create_pool(&database_url).await?;
    let storage = PgStorage::new(pool);

    let user = storage
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| AdminError::UserNotFound(email.to_string()))?;

    storage
        .set_user_admin(user.id, is_admin)
        .await?
        .ok_or_else(|| AdminError::UserNotFound(email.to_string()))?;

    if is_admin {
        tracing::info!("Admin flag granted to {}", email);
    } else {
        tracing::info!("Admin flag revoked from {}", email);
    }

    Ok(())
}
