//! Course domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use barrel_verse_core::{CourseCategory, CourseId, CourseLevel, Price};

/// A course in the catalogue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    /// Decimal price, serialized as an exact 2-dp string.
    pub price: Price,
    pub image: Option<String>,
    pub category: CourseCategory,
    /// Free-form, e.g. "2 hours" or "Self-paced".
    pub duration: Option<String>,
    pub level: Option<CourseLevel>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a course. The storage layer stamps id and timestamps
/// and defaults `is_published` to true when unspecified.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub price: Price,
    pub image: Option<String>,
    pub category: CourseCategory,
    pub duration: Option<String>,
    pub level: Option<CourseLevel>,
    pub is_published: Option<bool>,
}

/// Partial update: only `Some` fields are merged onto the stored course.
/// `updated_at` is refreshed unconditionally, even for an empty update.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub category: Option<CourseCategory>,
    pub duration: Option<String>,
    pub level: Option<CourseLevel>,
    pub is_published: Option<bool>,
}

impl Course {
    /// Merge a partial update onto this course, bumping `updated_at`.
    #[must_use]
    pub fn apply(mut self, changes: CourseUpdate, now: DateTime<Utc>) -> Self {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(long_description) = changes.long_description {
            self.long_description = Some(long_description);
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(image) = changes.image {
            self.image = Some(image);
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(duration) = changes.duration {
            self.duration = Some(duration);
        }
        if let Some(level) = changes.level {
            self.level = Some(level);
        }
        if let Some(is_published) = changes.is_published {
            self.is_published = is_published;
        }
        self.updated_at = now;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use barrel_verse_core::CourseId;

    fn sample() -> Course {
        Course {
            id: CourseId::generate(),
            title: "Barrel Aging Masterclass".to_string(),
            description: "Hands-on barrel finishing".to_string(),
            long_description: None,
            price: Price::parse("149.00").unwrap(),
            image: None,
            category: CourseCategory::Masterclass,
            duration: Some("2 hours".to_string()),
            level: None,
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_merges_only_supplied_fields() {
        let course = sample();
        let created_at = course.created_at;
        let now = Utc::now() + chrono::Duration::seconds(5);

        let updated = course.apply(
            CourseUpdate {
                title: Some("Advanced Barrel Aging".to_string()),
                is_published: Some(false),
                ..CourseUpdate::default()
            },
            now,
        );

        assert_eq!(updated.title, "Advanced Barrel Aging");
        assert!(!updated.is_published);
        assert_eq!(updated.description, "Hands-on barrel finishing");
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.updated_at, now);
    }

    #[test]
    fn test_apply_empty_update_still_bumps_updated_at() {
        let course = sample();
        let before = course.updated_at;
        let now = before + chrono::Duration::seconds(30);

        let updated = course.apply(CourseUpdate::default(), now);
        assert_eq!(updated.updated_at, now);
        assert_ne!(updated.updated_at, before);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("isPublished").is_some());
        assert!(json.get("longDescription").is_some());
        assert_eq!(json["price"], "149.00");
    }
}
