//! Experience routes: public catalogue and admin CRUD.
//!
//! Mirrors the course routes; the one wrinkle is the server-authoritative
//! attendee count, which no payload can set.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use barrel_verse_core::ExperienceId;

use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Experience, ExperienceUpdate, NewExperience};
use crate::state::AppState;
use crate::validation::{FieldError, Validator};

/// Creation payload. `currentAttendees`, if a client sends it, is simply
/// ignored - there is no field here for it to land in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperiencePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    /// RFC 3339 timestamp, e.g. `2026-09-12T18:00:00Z`.
    pub date: Option<String>,
    pub location: Option<String>,
    pub max_attendees: Option<i32>,
    pub is_published: Option<bool>,
}

impl CreateExperiencePayload {
    fn validate(self) -> std::result::Result<NewExperience, Vec<FieldError>> {
        let mut v = Validator::new();
        let title = v.require_text("title", self.title);
        let description = v.require_text("description", self.description);
        let price = v.require_price("price", self.price);
        let date: Option<DateTime<Utc>> = match self.date {
            Some(raw) => v.parse_variant("date", &raw),
            None => None,
        };

        match (v.finish(), title, description, price) {
            (Ok(()), Some(title), Some(description), Some(price)) => Ok(NewExperience {
                title,
                description,
                long_description: self.long_description,
                price,
                image: self.image,
                date,
                location: self.location,
                max_attendees: self.max_attendees,
                is_published: self.is_published,
            }),
            (Err(errors), ..) => Err(errors),
            _ => Err(Vec::new()),
        }
    }
}

/// Update payload: everything optional; only supplied fields are merged.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperiencePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub max_attendees: Option<i32>,
    pub is_published: Option<bool>,
}

impl UpdateExperiencePayload {
    fn validate(self) -> std::result::Result<ExperienceUpdate, Vec<FieldError>> {
        let mut v = Validator::new();
        let price = match self.price {
            Some(raw) => v.parse_price("price", &raw),
            None => None,
        };
        let date: Option<DateTime<Utc>> = match self.date {
            Some(raw) => v.parse_variant("date", &raw),
            None => None,
        };
        v.finish()?;

        Ok(ExperienceUpdate {
            title: self.title,
            description: self.description,
            long_description: self.long_description,
            price,
            image: self.image,
            date,
            location: self.location,
            max_attendees: self.max_attendees,
            is_published: self.is_published,
        })
    }
}

// ============================================================================
// Public handlers
// ============================================================================

/// List published experiences.
///
/// GET /api/experiences
pub async fn list_published(State(state): State<AppState>) -> Result<Json<Vec<Experience>>> {
    let experiences = state.storage().list_published_experiences().await?;
    Ok(Json(experiences))
}

/// Get one published experience.
///
/// GET /api/experiences/{id}
pub async fn get_published(
    State(state): State<AppState>,
    Path(id): Path<ExperienceId>,
) -> Result<Json<Experience>> {
    let experience = state
        .storage()
        .get_experience(id)
        .await?
        .filter(|e| e.is_published)
        .ok_or_else(|| ApiError::NotFound("Experience".to_owned()))?;

    Ok(Json(experience))
}

// ============================================================================
// Admin handlers
// ============================================================================

/// List all experiences, published or not.
///
/// GET /api/admin/experiences
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Experience>>> {
    let experiences = state.storage().list_experiences().await?;
    Ok(Json(experiences))
}

/// Get one experience regardless of publish state.
///
/// GET /api/admin/experiences/{id}
pub async fn get_any(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ExperienceId>,
) -> Result<Json<Experience>> {
    let experience = state
        .storage()
        .get_experience(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Experience".to_owned()))?;

    Ok(Json(experience))
}

/// Create an experience.
///
/// POST /api/admin/experiences
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<CreateExperiencePayload>,
) -> Result<Json<Experience>> {
    let new_experience = payload.validate().map_err(ApiError::Validation)?;
    let experience = state.storage().create_experience(new_experience).await?;

    tracing::info!(experience_id = %experience.id, "experience created");
    Ok(Json(experience))
}

/// Partially update an experience.
///
/// PUT /api/admin/experiences/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ExperienceId>,
    Json(payload): Json<UpdateExperiencePayload>,
) -> Result<Json<Experience>> {
    let changes = payload.validate().map_err(ApiError::Validation)?;
    let experience = state
        .storage()
        .update_experience(id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Experience".to_owned()))?;

    Ok(Json(experience))
}

/// Delete an experience.
///
/// DELETE /api/admin/experiences/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ExperienceId>,
) -> Result<Json<Value>> {
    let deleted = state.storage().delete_experience(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Experience".to_owned()));
    }

    tracing::info!(experience_id = %id, "experience deleted");
    Ok(Json(json!({ "success": true })))
}
