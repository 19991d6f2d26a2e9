//! Closed enums for the catalogue and purchase domain.
//!
//! All variants serialize as their lowercase wire names ("masterclass",
//! "completed", ...). The `as_str`/`FromStr` pair is what the persistent
//! store uses for its TEXT columns.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a member of a closed enum.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown {kind}: '{value}' (expected one of {expected})")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
            expected,
        }
    }
}

/// Course category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseCategory {
    Masterclass,
    Video,
    Membership,
}

impl CourseCategory {
    /// The lowercase wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Masterclass => "masterclass",
            Self::Video => "video",
            Self::Membership => "membership",
        }
    }
}

impl FromStr for CourseCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "masterclass" => Ok(Self::Masterclass),
            "video" => Ok(Self::Video),
            "membership" => Ok(Self::Membership),
            other => Err(UnknownVariant::new(
                "category",
                other,
                "masterclass, video, membership",
            )),
        }
    }
}

impl fmt::Display for CourseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Course difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    /// The lowercase wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for CourseLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(UnknownVariant::new(
                "level",
                other,
                "beginner, intermediate, advanced",
            )),
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of item a purchase references.
///
/// The reference itself is loosely typed: `itemType` + `itemId`, with no
/// foreign key into either table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Course,
    Experience,
}

impl ItemType {
    /// The lowercase wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Experience => "experience",
        }
    }
}

impl FromStr for ItemType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course" => Ok(Self::Course),
            "experience" => Ok(Self::Experience),
            other => Err(UnknownVariant::new(
                "item type",
                other,
                "course, experience",
            )),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase lifecycle status.
///
/// New purchases are always recorded as [`Completed`](Self::Completed); the
/// other states exist for payment-provider reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    #[default]
    Completed,
    Refunded,
}

impl PurchaseStatus {
    /// The lowercase wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Refunded => "refunded",
        }
    }
}

impl FromStr for PurchaseStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownVariant::new(
                "status",
                other,
                "pending, completed, refunded",
            )),
        }
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in [
            CourseCategory::Masterclass,
            CourseCategory::Video,
            CourseCategory::Membership,
        ] {
            assert_eq!(category.as_str().parse::<CourseCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_rejects_unknown() {
        let err = "workshop".parse::<CourseCategory>().unwrap_err();
        assert!(err.to_string().contains("workshop"));
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&CourseCategory::Masterclass).unwrap(),
            "\"masterclass\""
        );
        assert_eq!(
            serde_json::to_string(&PurchaseStatus::Completed).unwrap(),
            "\"completed\""
        );
        let level: CourseLevel = serde_json::from_str("\"beginner\"").unwrap();
        assert_eq!(level, CourseLevel::Beginner);
    }

    #[test]
    fn test_purchase_status_defaults_to_completed() {
        assert_eq!(PurchaseStatus::default(), PurchaseStatus::Completed);
    }

    #[test]
    fn test_item_type_round_trip() {
        assert_eq!("course".parse::<ItemType>().unwrap(), ItemType::Course);
        assert_eq!(
            "experience".parse::<ItemType>().unwrap(),
            ItemType::Experience
        );
        assert!("bundle".parse::<ItemType>().is_err());
    }
}
