//! Purchase domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use barrel_verse_core::{ItemType, Price, PurchaseId, PurchaseStatus, UserId};

/// A recorded purchase.
///
/// The item reference is loose by design: `item_type` + `item_id` with no
/// foreign key into the course or experience tables.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    /// The buying user. Always taken from the session, never the body.
    pub user_id: UserId,
    pub item_type: ItemType,
    pub item_id: Uuid,
    pub amount: Price,
    /// Opaque reference into the external payment provider, if any.
    pub payment_ref: Option<String>,
    /// Force-set to `completed` at creation.
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a purchase. The storage layer stamps id, status, and
/// the creation timestamp.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub user_id: UserId,
    pub item_type: ItemType,
    pub item_id: Uuid,
    pub amount: Price,
    pub payment_ref: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let purchase = Purchase {
            id: PurchaseId::generate(),
            user_id: UserId::generate(),
            item_type: ItemType::Course,
            item_id: Uuid::new_v4(),
            amount: Price::parse("19.99").unwrap(),
            payment_ref: None,
            status: PurchaseStatus::Completed,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(purchase).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("itemType").is_some());
        assert_eq!(json["status"], "completed");
        assert_eq!(json["amount"], "19.99");
    }
}
