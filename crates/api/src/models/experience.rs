//! Experience (in-person event) domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use barrel_verse_core::{ExperienceId, Price};

/// A bookable experience.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: ExperienceId,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub price: Price,
    pub image: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_attendees: Option<i32>,
    /// Server-maintained head count. Clients can never set this; creation
    /// forces it to 0 regardless of input.
    pub current_attendees: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an experience. There is deliberately no
/// `current_attendees` field here - the count is server-authoritative.
#[derive(Debug, Clone)]
pub struct NewExperience {
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub price: Price,
    pub image: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_attendees: Option<i32>,
    pub is_published: Option<bool>,
}

/// Partial update: only `Some` fields are merged onto the stored experience.
#[derive(Debug, Clone, Default)]
pub struct ExperienceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_attendees: Option<i32>,
    pub is_published: Option<bool>,
}

impl Experience {
    /// Merge a partial update onto this experience, bumping `updated_at`.
    #[must_use]
    pub fn apply(mut self, changes: ExperienceUpdate, now: DateTime<Utc>) -> Self {
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
        if let Some(date) = changes.date {
            self.date = Some(date);
        }
        if let Some(location) = changes.location {
            self.location = Some(location);
        }
        if let Some(max_attendees) = changes.max_attendees {
            self.max_attendees = Some(max_attendees);
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

    fn sample() -> Experience {
        Experience {
            id: ExperienceId::generate(),
            title: "Distillery Tour".to_string(),
            description: "Walk the rickhouse".to_string(),
            long_description: None,
            price: Price::parse("75.00").unwrap(),
            image: None,
            date: None,
            location: Some("Louisville, KY".to_string()),
            max_attendees: Some(24),
            current_attendees: 0,
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_keeps_attendee_count() {
        let experience = sample();
        let now = Utc::now();
        let updated = experience.apply(
            ExperienceUpdate {
                max_attendees: Some(30),
                ..ExperienceUpdate::default()
            },
            now,
        );
        assert_eq!(updated.max_attendees, Some(30));
        assert_eq!(updated.current_attendees, 0);
        assert_eq!(updated.updated_at, now);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["currentAttendees"], 0);
        assert_eq!(json["maxAttendees"], 24);
        assert!(json.get("isPublished").is_some());
    }
}
