//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use barrel_verse_core::{Email, UserId};

/// A registered user as the storage layer owns it.
///
/// Deliberately not `Serialize`: the password hash must never leave the
/// process, so responses go through [`UserResponse`] instead.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique).
    pub email: Email,
    /// Argon2id hash of the password. Never the plaintext.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Admin flag. Always false at registration; flipped via the CLI.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user. The storage layer stamps id, the admin flag,
/// and the creation timestamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub name: String,
}

/// The wire representation of a user: everything except the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}
