//! `PostgreSQL`-backed storage.
//!
//! Reads and writes translate to equality-filtered queries over the four
//! tables created by `crates/api/migrations/`. Row structs decode with
//! `FromRow` and convert into domain types via `TryFrom`, so corrupt rows
//! surface as [`StorageError::DataCorruption`] instead of panics.
//!
//! Invariant: optional fields are always bound explicitly on writes, so a
//! field the caller omitted persists as SQL `NULL` - rows stay consistent
//! regardless of what the caller supplied. Concurrency control is the
//! database's problem; no in-process locks here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use barrel_verse_core::{
    CourseCategory, CourseId, CourseLevel, Email, ExperienceId, ItemType, Price, PurchaseId,
    PurchaseStatus, UserId,
};

use super::{Storage, StorageError, StorageResult};
use crate::models::{
    Course, CourseUpdate, Experience, ExperienceUpdate, NewCourse, NewExperience, NewPurchase,
    NewUser, Purchase, User,
};

/// `PostgreSQL` [`Storage`] implementation.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    password_hash: String,
    name: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            StorageError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            password_hash: row.password_hash,
            name: row.name,
            is_admin: row.is_admin,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: CourseId,
    title: String,
    description: String,
    long_description: Option<String>,
    price: Price,
    image: Option<String>,
    category: String,
    duration: Option<String>,
    level: Option<String>,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = StorageError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<CourseCategory>().map_err(|e| {
            StorageError::DataCorruption(format!("invalid category in database: {e}"))
        })?;
        let level = row
            .level
            .as_deref()
            .map(str::parse::<CourseLevel>)
            .transpose()
            .map_err(|e| StorageError::DataCorruption(format!("invalid level in database: {e}")))?;

        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            long_description: row.long_description,
            price: row.price,
            image: row.image,
            category,
            duration: row.duration,
            level,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExperienceRow {
    id: ExperienceId,
    title: String,
    description: String,
    long_description: Option<String>,
    price: Price,
    image: Option<String>,
    date: Option<DateTime<Utc>>,
    location: Option<String>,
    max_attendees: Option<i32>,
    current_attendees: i32,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ExperienceRow> for Experience {
    fn from(row: ExperienceRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            long_description: row.long_description,
            price: row.price,
            image: row.image,
            date: row.date,
            location: row.location,
            max_attendees: row.max_attendees,
            current_attendees: row.current_attendees,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: PurchaseId,
    user_id: UserId,
    item_type: String,
    item_id: Uuid,
    amount: Price,
    payment_ref: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = StorageError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let item_type = row.item_type.parse::<ItemType>().map_err(|e| {
            StorageError::DataCorruption(format!("invalid item type in database: {e}"))
        })?;
        let status = row.status.parse::<PurchaseStatus>().map_err(|e| {
            StorageError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            item_type,
            item_id: row.item_id,
            amount: row.amount,
            payment_ref: row.payment_ref,
            status,
            created_at: row.created_at,
        })
    }
}

// =============================================================================
// Column lists
// =============================================================================

const USER_COLUMNS: &str = "id, email, password_hash, name, is_admin, created_at";
const COURSE_COLUMNS: &str = "id, title, description, long_description, price, image, category, \
                              duration, level, is_published, created_at, updated_at";
const EXPERIENCE_COLUMNS: &str = "id, title, description, long_description, price, image, date, \
                                  location, max_attendees, current_attendees, is_published, \
                                  created_at, updated_at";
const PURCHASE_COLUMNS: &str =
    "id, user_id, item_type, item_id, amount, payment_ref, status, created_at";

fn map_unique_violation(e: sqlx::Error, message: &str) -> StorageError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StorageError::Conflict(message.to_owned());
    }
    StorageError::Database(e)
}

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    async fn get_user(&self, id: UserId) -> StorageResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_user_by_email(&self, email: &Email) -> StorageResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, email, password_hash, name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(UserId::generate())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Email already registered"))?;

        row.try_into()
    }

    async fn set_user_admin(&self, id: UserId, is_admin: bool) -> StorageResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET is_admin = $2 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(is_admin)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    // ------------------------------------------------------------------
    // Courses
    // ------------------------------------------------------------------

    async fn list_courses(&self) -> StorageResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_published_courses(&self) -> StorageResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE is_published ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_course(&self, id: CourseId) -> StorageResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create_course(&self, course: NewCourse) -> StorageResult<Course> {
        // Optionals bound explicitly: omitted fields persist as NULL
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "INSERT INTO courses \
             (id, title, description, long_description, price, image, category, duration, \
              level, is_published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(CourseId::generate())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.long_description)
        .bind(course.price)
        .bind(&course.image)
        .bind(course.category.as_str())
        .bind(&course.duration)
        .bind(course.level.map(CourseLevel::as_str))
        .bind(course.is_published.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn update_course(
        &self,
        id: CourseId,
        changes: CourseUpdate,
    ) -> StorageResult<Option<Course>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let updated = Course::try_from(row)?.apply(changes, Utc::now());

        sqlx::query(
            "UPDATE courses SET \
             title = $2, description = $3, long_description = $4, price = $5, image = $6, \
             category = $7, duration = $8, level = $9, is_published = $10, updated_at = $11 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(&updated.long_description)
        .bind(updated.price)
        .bind(&updated.image)
        .bind(updated.category.as_str())
        .bind(&updated.duration)
        .bind(updated.level.map(CourseLevel::as_str))
        .bind(updated.is_published)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_course(&self, id: CourseId) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Experiences
    // ------------------------------------------------------------------

    async fn list_experiences(&self) -> StorageResult<Vec<Experience>> {
        let rows = sqlx::query_as::<_, ExperienceRow>(&format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experiences ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_published_experiences(&self) -> StorageResult<Vec<Experience>> {
        let rows = sqlx::query_as::<_, ExperienceRow>(&format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experiences WHERE is_published \
             ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_experience(&self, id: ExperienceId) -> StorageResult<Option<Experience>> {
        let row = sqlx::query_as::<_, ExperienceRow>(&format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experiences WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create_experience(&self, experience: NewExperience) -> StorageResult<Experience> {
        // current_attendees starts at 0 unconditionally; optionals bound
        // explicitly so omitted fields persist as NULL
        let row = sqlx::query_as::<_, ExperienceRow>(&format!(
            "INSERT INTO experiences \
             (id, title, description, long_description, price, image, date, location, \
              max_attendees, current_attendees, is_published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, $10) \
             RETURNING {EXPERIENCE_COLUMNS}"
        ))
        .bind(ExperienceId::generate())
        .bind(&experience.title)
        .bind(&experience.description)
        .bind(&experience.long_description)
        .bind(experience.price)
        .bind(&experience.image)
        .bind(experience.date)
        .bind(&experience.location)
        .bind(experience.max_attendees)
        .bind(experience.is_published.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_experience(
        &self,
        id: ExperienceId,
        changes: ExperienceUpdate,
    ) -> StorageResult<Option<Experience>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ExperienceRow>(&format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experiences WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let updated = Experience::from(row).apply(changes, Utc::now());

        sqlx::query(
            "UPDATE experiences SET \
             title = $2, description = $3, long_description = $4, price = $5, image = $6, \
             date = $7, location = $8, max_attendees = $9, is_published = $10, updated_at = $11 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(&updated.long_description)
        .bind(updated.price)
        .bind(&updated.image)
        .bind(updated.date)
        .bind(&updated.location)
        .bind(updated.max_attendees)
        .bind(updated.is_published)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_experience(&self, id: ExperienceId) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------

    async fn create_purchase(&self, purchase: NewPurchase) -> StorageResult<Purchase> {
        let row = sqlx::query_as::<_, PurchaseRow>(&format!(
            "INSERT INTO purchases (id, user_id, item_type, item_id, amount, payment_ref, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PURCHASE_COLUMNS}"
        ))
        .bind(PurchaseId::generate())
        .bind(purchase.user_id)
        .bind(purchase.item_type.as_str())
        .bind(purchase.item_id)
        .bind(purchase.amount)
        .bind(&purchase.payment_ref)
        .bind(PurchaseStatus::Completed.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn purchases_for_user(&self, user_id: UserId) -> StorageResult<Vec<Purchase>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_purchase(&self, id: PurchaseId) -> StorageResult<Option<Purchase>> {
        let row = sqlx::query_as::<_, PurchaseRow>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
