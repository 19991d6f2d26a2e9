//! Volatile in-memory storage.
//!
//! Entities live in process-local maps and vanish on restart. List
//! operations are full scans with a predicate. The tokio runtime dispatches
//! handlers across threads, so every operation takes the table lock.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use barrel_verse_core::{CourseId, Email, ExperienceId, PurchaseId, PurchaseStatus, UserId};

use super::{Storage, StorageError, StorageResult};
use crate::models::{
    Course, CourseUpdate, Experience, ExperienceUpdate, NewCourse, NewExperience, NewPurchase,
    NewUser, Purchase, User,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    courses: HashMap<CourseId, Course>,
    experiences: HashMap<ExperienceId, Experience>,
    purchases: HashMap<PurchaseId, Purchase>,
}

/// Map-backed [`Storage`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    async fn get_user(&self, id: UserId) -> StorageResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &Email) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| &u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let mut tables = self.tables.write().await;

        // Email uniqueness is a schema constraint in the persistent store;
        // enforce the same invariant here
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StorageError::Conflict(
                "Email already registered".to_string(),
            ));
        }

        let user = User {
            id: UserId::generate(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            is_admin: false,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_user_admin(&self, id: UserId, is_admin: bool) -> StorageResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.is_admin = is_admin;
            user.clone()
        }))
    }

    // ------------------------------------------------------------------
    // Courses
    // ------------------------------------------------------------------

    async fn list_courses(&self) -> StorageResult<Vec<Course>> {
        Ok(self.tables.read().await.courses.values().cloned().collect())
    }

    async fn list_published_courses(&self) -> StorageResult<Vec<Course>> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .values()
            .filter(|c| c.is_published)
            .cloned()
            .collect())
    }

    async fn get_course(&self, id: CourseId) -> StorageResult<Option<Course>> {
        Ok(self.tables.read().await.courses.get(&id).cloned())
    }

    async fn create_course(&self, course: NewCourse) -> StorageResult<Course> {
        let now = Utc::now();
        let course = Course {
            id: CourseId::generate(),
            title: course.title,
            description: course.description,
            long_description: course.long_description,
            price: course.price,
            image: course.image,
            category: course.category,
            duration: course.duration,
            level: course.level,
            is_published: course.is_published.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .courses
            .insert(course.id, course.clone());
        Ok(course)
    }

    async fn update_course(
        &self,
        id: CourseId,
        changes: CourseUpdate,
    ) -> StorageResult<Option<Course>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.courses.get(&id).cloned() else {
            return Ok(None);
        };
        let updated = existing.apply(changes, Utc::now());
        tables.courses.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_course(&self, id: CourseId) -> StorageResult<bool> {
        Ok(self.tables.write().await.courses.remove(&id).is_some())
    }

    // ------------------------------------------------------------------
    // Experiences
    // ------------------------------------------------------------------

    async fn list_experiences(&self) -> StorageResult<Vec<Experience>> {
        Ok(self
            .tables
            .read()
            .await
            .experiences
            .values()
            .cloned()
            .collect())
    }

    async fn list_published_experiences(&self) -> StorageResult<Vec<Experience>> {
        let tables = self.tables.read().await;
        Ok(tables
            .experiences
            .values()
            .filter(|e| e.is_published)
            .cloned()
            .collect())
    }

    async fn get_experience(&self, id: ExperienceId) -> StorageResult<Option<Experience>> {
        Ok(self.tables.read().await.experiences.get(&id).cloned())
    }

    async fn create_experience(&self, experience: NewExperience) -> StorageResult<Experience> {
        let now = Utc::now();
        let experience = Experience {
            id: ExperienceId::generate(),
            title: experience.title,
            description: experience.description,
            long_description: experience.long_description,
            price: experience.price,
            image: experience.image,
            date: experience.date,
            location: experience.location,
            max_attendees: experience.max_attendees,
            // Server-authoritative, whatever the client sent
            current_attendees: 0,
            is_published: experience.is_published.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .experiences
            .insert(experience.id, experience.clone());
        Ok(experience)
    }

    async fn update_experience(
        &self,
        id: ExperienceId,
        changes: ExperienceUpdate,
    ) -> StorageResult<Option<Experience>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.experiences.get(&id).cloned() else {
            return Ok(None);
        };
        let updated = existing.apply(changes, Utc::now());
        tables.experiences.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_experience(&self, id: ExperienceId) -> StorageResult<bool> {
        Ok(self.tables.write().await.experiences.remove(&id).is_some())
    }

    // ------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------

    async fn create_purchase(&self, purchase: NewPurchase) -> StorageResult<Purchase> {
        let purchase = Purchase {
            id: PurchaseId::generate(),
            user_id: purchase.user_id,
            item_type: purchase.item_type,
            item_id: purchase.item_id,
            amount: purchase.amount,
            payment_ref: purchase.payment_ref,
            status: PurchaseStatus::Completed,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .purchases
            .insert(purchase.id, purchase.clone());
        Ok(purchase)
    }

    async fn purchases_for_user(&self, user_id: UserId) -> StorageResult<Vec<Purchase>> {
        let tables = self.tables.read().await;
        Ok(tables
            .purchases
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_purchase(&self, id: PurchaseId) -> StorageResult<Option<Purchase>> {
        Ok(self.tables.read().await.purchases.get(&id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use barrel_verse_core::{CourseCategory, ItemType, Price};
    use uuid::Uuid;

    fn new_course(title: &str, is_published: Option<bool>) -> NewCourse {
        NewCourse {
            title: title.to_string(),
            description: "desc".to_string(),
            long_description: None,
            price: Price::parse("19.99").unwrap(),
            image: None,
            category: CourseCategory::Video,
            duration: None,
            level: None,
            is_published,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_string(),
            name: "Someone".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let store = MemoryStorage::new();
        store.create_user(new_user("a@b.c")).await.unwrap();
        let err = store.create_user(new_user("a@b.c")).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        // The failed insert must not grow the table
        let survivor = store
            .get_user_by_email(&Email::parse("a@b.c").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(survivor.name, "Someone");
    }

    #[tokio::test]
    async fn test_users_are_never_admin_at_creation() {
        let store = MemoryStorage::new();
        let user = store.create_user(new_user("a@b.c")).await.unwrap();
        assert!(!user.is_admin);

        let promoted = store.set_user_admin(user.id, true).await.unwrap().unwrap();
        assert!(promoted.is_admin);
    }

    #[tokio::test]
    async fn test_course_publish_defaults_true() {
        let store = MemoryStorage::new();
        let course = store.create_course(new_course("A", None)).await.unwrap();
        assert!(course.is_published);

        let hidden = store
            .create_course(new_course("B", Some(false)))
            .await
            .unwrap();
        assert!(!hidden.is_published);

        assert_eq!(store.list_published_courses().await.unwrap().len(), 1);
        assert_eq!(store.list_courses().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_course_mutates_nothing() {
        let store = MemoryStorage::new();
        store.create_course(new_course("A", None)).await.unwrap();

        let result = store
            .update_course(CourseId::generate(), CourseUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());

        let all = store.list_courses().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.first().unwrap().title, "A");
    }

    #[tokio::test]
    async fn test_empty_update_bumps_updated_at() {
        let store = MemoryStorage::new();
        let course = store.create_course(new_course("A", None)).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let updated = store
            .update_course(course.id, CourseUpdate::default())
            .await
            .unwrap()
            .unwrap();
        assert!(updated.updated_at > course.updated_at);
        assert_eq!(updated.created_at, course.created_at);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStorage::new();
        let course = store.create_course(new_course("A", None)).await.unwrap();
        assert!(store.delete_course(course.id).await.unwrap());
        assert!(!store.delete_course(course.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_experience_attendees_forced_to_zero() {
        let store = MemoryStorage::new();
        let experience = store
            .create_experience(NewExperience {
                title: "Tour".to_string(),
                description: "desc".to_string(),
                long_description: None,
                price: Price::parse("75.00").unwrap(),
                image: None,
                date: None,
                location: None,
                max_attendees: Some(10),
                is_published: None,
            })
            .await
            .unwrap();
        assert_eq!(experience.current_attendees, 0);
        assert!(experience.is_published);
    }

    #[tokio::test]
    async fn test_purchase_status_forced_completed_and_scoped() {
        let store = MemoryStorage::new();
        let alice = store.create_user(new_user("alice@b.c")).await.unwrap();
        let bob = store.create_user(new_user("bob@b.c")).await.unwrap();

        let purchase = store
            .create_purchase(NewPurchase {
                user_id: alice.id,
                item_type: ItemType::Course,
                item_id: Uuid::new_v4(),
                amount: Price::parse("19.99").unwrap(),
                payment_ref: None,
            })
            .await
            .unwrap();
        assert_eq!(purchase.status, PurchaseStatus::Completed);

        assert_eq!(store.purchases_for_user(alice.id).await.unwrap().len(), 1);
        assert!(store.purchases_for_user(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_price_round_trip_is_exact() {
        let store = MemoryStorage::new();
        let course = store.create_course(new_course("A", None)).await.unwrap();
        let fetched = store.get_course(course.id).await.unwrap().unwrap();
        assert_eq!(fetched.price.to_string(), "19.99");
    }
}
