//! Authentication service.
//!
//! Email + password registration and login over the storage contract.
//! Passwords are hashed with Argon2id and never stored or logged in
//! plaintext.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use barrel_verse_core::Email;

use crate::models::{NewUser, User};
use crate::storage::{Storage, StorageError};
use crate::validation::MIN_PASSWORD_LENGTH;

/// Authentication service.
///
/// Handles user registration and login. Constructed per-request; borrows
/// the active storage backend.
pub struct AuthService<'a> {
    storage: &'a dyn Storage,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Register a new user with email and password.
    ///
    /// The new account is never an admin; the flag is only granted out of
    /// band (see the `admin grant` CLI command).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password doesn't meet
    /// requirements, `AuthError::EmailTaken` if the email is already
    /// registered.
    pub async fn register(
        &self,
        email: Email,
        password: &str,
        name: String,
    ) -> Result<User, AuthError> {
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .storage
            .create_user(NewUser {
                email,
                password_hash,
                name,
            })
            .await
            .map_err(|e| match e {
                StorageError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Storage(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email and for
    /// a wrong password alike.
    pub async fn login(&self, email: &Email, password: &str) -> Result<User, AuthError> {
        let user = self
            .storage
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
