//! Storage layer: one contract, two backends.
//!
//! Every entity read hits the backing store directly - nothing is cached
//! here. Exactly one implementation is active per process:
//!
//! - [`MemoryStorage`] - volatile, map-backed; the default when no database
//!   URL is configured. Lost on restart.
//! - [`PgStorage`] - `PostgreSQL` via sqlx; selected whenever a connection
//!   string is present, and mandatory in production.
//!
//! Shared contract details (both backends):
//!
//! - lookups return `Ok(None)` for missing rows, never an error
//! - deletes are idempotent and report `false` for unknown ids
//! - partial updates merge supplied fields and always bump `updated_at`
//! - IDs are random UUIDv4 minted here, never accepted from callers
//! - `is_published` defaults true; `current_attendees` and purchase status
//!   are force-set (0 / `completed`) regardless of input
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p barrel-verse-cli -- migrate
//! ```
//! They are never run automatically at server startup.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use barrel_verse_core::{CourseId, Email, ExperienceId, PurchaseId, UserId};

use crate::models::{
    Course, CourseUpdate, Experience, ExperienceUpdate, NewCourse, NewExperience, NewPurchase,
    NewUser, Purchase, User,
};

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g. unique email).
    #[error("{0}")]
    Conflict(String),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// The uniform persistence contract.
///
/// All operations are async (the persistent backend does I/O) and
/// object-safe so startup can pick an implementation behind `Arc<dyn
/// Storage>`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Probe the backing store (readiness checks).
    async fn ping(&self) -> StorageResult<()>;

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Look up a user by id.
    async fn get_user(&self, id: UserId) -> StorageResult<Option<User>>;

    /// Look up a user by their unique email.
    async fn get_user_by_email(&self, email: &Email) -> StorageResult<Option<User>>;

    /// Create a user. The admin flag starts false and `created_at` is
    /// stamped here. Fails with [`StorageError::Conflict`] on a duplicate
    /// email.
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;

    /// Flip a user's admin flag. Returns the updated user, or `None` for an
    /// unknown id.
    async fn set_user_admin(&self, id: UserId, is_admin: bool) -> StorageResult<Option<User>>;

    // ------------------------------------------------------------------
    // Courses
    // ------------------------------------------------------------------

    /// All courses, published or not (admin view).
    async fn list_courses(&self) -> StorageResult<Vec<Course>>;

    /// Published courses only (public view).
    async fn list_published_courses(&self) -> StorageResult<Vec<Course>>;

    /// Look up a course by id, regardless of publish state.
    async fn get_course(&self, id: CourseId) -> StorageResult<Option<Course>>;

    /// Create a course, stamping id/timestamps and defaulting
    /// `is_published` to true.
    async fn create_course(&self, course: NewCourse) -> StorageResult<Course>;

    /// Merge a partial update. `None` for an unknown id; nothing is mutated
    /// in that case.
    async fn update_course(
        &self,
        id: CourseId,
        changes: CourseUpdate,
    ) -> StorageResult<Option<Course>>;

    /// Delete by id. `false` when the id was already absent.
    async fn delete_course(&self, id: CourseId) -> StorageResult<bool>;

    // ------------------------------------------------------------------
    // Experiences
    // ------------------------------------------------------------------

    /// All experiences, published or not (admin view).
    async fn list_experiences(&self) -> StorageResult<Vec<Experience>>;

    /// Published experiences only (public view).
    async fn list_published_experiences(&self) -> StorageResult<Vec<Experience>>;

    /// Look up an experience by id, regardless of publish state.
    async fn get_experience(&self, id: ExperienceId) -> StorageResult<Option<Experience>>;

    /// Create an experience. `current_attendees` is force-set to 0.
    async fn create_experience(&self, experience: NewExperience) -> StorageResult<Experience>;

    /// Merge a partial update. `None` for an unknown id.
    async fn update_experience(
        &self,
        id: ExperienceId,
        changes: ExperienceUpdate,
    ) -> StorageResult<Option<Experience>>;

    /// Delete by id. `false` when the id was already absent.
    async fn delete_experience(&self, id: ExperienceId) -> StorageResult<bool>;

    // ------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------

    /// Record a purchase. Status is force-set to `completed`.
    async fn create_purchase(&self, purchase: NewPurchase) -> StorageResult<Purchase>;

    /// All purchases belonging to one user.
    async fn purchases_for_user(&self, user_id: UserId) -> StorageResult<Vec<Purchase>>;

    /// Look up a purchase by id.
    async fn get_purchase(&self, id: PurchaseId) -> StorageResult<Option<Purchase>>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Embedded application migrations (see `crates/api/migrations/`).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Run all pending application migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
