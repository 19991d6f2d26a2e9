//! CLI command implementations.

pub mod admin;
pub mod migrate;

use secrecy::SecretString;

/// Resolve the database connection string from the environment.
///
/// Checks `BV_DATABASE_URL` first, then the generic `DATABASE_URL`.
pub(crate) fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var("BV_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
