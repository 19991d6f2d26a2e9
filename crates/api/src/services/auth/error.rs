//! Authentication error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password. Deliberately indistinguishable between the
    /// two so login responses leak nothing about account existence.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email already has an account.
    #[error("email already registered")]
    EmailTaken,

    /// Password does not meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
