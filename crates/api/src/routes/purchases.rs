//! Purchase routes.
//!
//! Always scoped to the session's user: the buyer id comes from the
//! session, never the body, and listings only return the caller's own
//! purchases.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use uuid::Uuid;

use barrel_verse_core::{ItemType, Price, PurchaseId};

use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewPurchase, Purchase};
use crate::state::AppState;
use crate::validation::{FieldError, Validator};

/// Purchase payload. Any `userId` or `status` a client sends is ignored:
/// neither has a field here, and unknown keys are dropped at
/// deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchasePayload {
    pub item_type: Option<String>,
    pub item_id: Option<String>,
    pub amount: Option<String>,
    pub payment_ref: Option<String>,
}

/// Validated purchase input, still missing the buyer (filled in by the
/// handler from the session).
struct ValidatedPurchase {
    item_type: ItemType,
    item_id: Uuid,
    amount: Price,
    payment_ref: Option<String>,
}

impl CreatePurchasePayload {
    fn validate(self) -> std::result::Result<ValidatedPurchase, Vec<FieldError>> {
        let mut v = Validator::new();
        let item_type: Option<ItemType> = v.require_variant("itemType", self.item_type);
        let item_id: Option<Uuid> = match v.require_text("itemId", self.item_id) {
            Some(raw) => v.parse_variant("itemId", &raw),
            None => None,
        };
        let amount = v.require_price("amount", self.amount);

        match (v.finish(), item_type, item_id, amount) {
            (Ok(()), Some(item_type), Some(item_id), Some(amount)) => Ok(ValidatedPurchase {
                item_type,
                item_id,
                amount,
                payment_ref: self.payment_ref,
            }),
            (Err(errors), ..) => Err(errors),
            _ => Err(Vec::new()),
        }
    }
}

/// List the caller's purchases.
///
/// GET /api/purchases
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<Purchase>>> {
    let purchases = state.storage().purchases_for_user(current.id).await?;
    Ok(Json(purchases))
}

/// Record a purchase for the caller.
///
/// POST /api/purchases
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(payload): Json<CreatePurchasePayload>,
) -> Result<Json<Purchase>> {
    let validated = payload.validate().map_err(ApiError::Validation)?;

    let purchase = state
        .storage()
        .create_purchase(NewPurchase {
            user_id: current.id,
            item_type: validated.item_type,
            item_id: validated.item_id,
            amount: validated.amount,
            payment_ref: validated.payment_ref,
        })
        .await?;

    tracing::info!(purchase_id = %purchase.id, user_id = %current.id, "purchase recorded");
    Ok(Json(purchase))
}

/// Get one of the caller's purchases.
///
/// GET /api/purchases/{id}
///
/// Another user's purchase 404s rather than 403s, so ids can't be probed.
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<PurchaseId>,
) -> Result<Json<Purchase>> {
    let purchase = state
        .storage()
        .get_purchase(id)
        .await?
        .filter(|p| p.user_id == current.id)
        .ok_or_else(|| ApiError::NotFound("Purchase".to_owned()))?;

    Ok(Json(purchase))
}
