//! Course routes: public catalogue and admin CRUD.
//!
//! The public handlers only ever see published courses; a course that
//! exists but is unpublished 404s exactly like one that never existed.
//! Admin handlers see everything.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use barrel_verse_core::{CourseCategory, CourseId, CourseLevel};

use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Course, CourseUpdate, NewCourse};
use crate::state::AppState;
use crate::validation::{FieldError, Validator};

/// Creation payload. Required fields are serde-optional so presence is
/// checked by the validator, producing a full field-error list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoursePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub duration: Option<String>,
    pub level: Option<String>,
    pub is_published: Option<bool>,
}

impl CreateCoursePayload {
    fn validate(self) -> std::result::Result<NewCourse, Vec<FieldError>> {
        let mut v = Validator::new();
        let title = v.require_text("title", self.title);
        let description = v.require_text("description", self.description);
        let price = v.require_price("price", self.price);
        let category: Option<CourseCategory> = v.require_variant("category", self.category);
        let level: Option<CourseLevel> = match self.level {
            Some(raw) => v.parse_variant("level", &raw),
            None => None,
        };

        match (v.finish(), title, description, price, category) {
            (Ok(()), Some(title), Some(description), Some(price), Some(category)) => {
                Ok(NewCourse {
                    title,
                    description,
                    long_description: self.long_description,
                    price,
                    image: self.image,
                    category,
                    duration: self.duration,
                    level,
                    is_published: self.is_published,
                })
            }
            (Err(errors), ..) => Err(errors),
            _ => Err(Vec::new()),
        }
    }
}

/// Update payload: everything optional; only supplied fields are merged.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoursePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub duration: Option<String>,
    pub level: Option<String>,
    pub is_published: Option<bool>,
}

impl UpdateCoursePayload {
    fn validate(self) -> std::result::Result<CourseUpdate, Vec<FieldError>> {
        let mut v = Validator::new();
        let price = match self.price {
            Some(raw) => v.parse_price("price", &raw),
            None => None,
        };
        let category: Option<CourseCategory> = match self.category {
            Some(raw) => v.parse_variant("category", &raw),
            None => None,
        };
        let level: Option<CourseLevel> = match self.level {
            Some(raw) => v.parse_variant("level", &raw),
            None => None,
        };
        v.finish()?;

        Ok(CourseUpdate {
            title: self.title,
            description: self.description,
            long_description: self.long_description,
            price,
            image: self.image,
            category,
            duration: self.duration,
            level,
            is_published: self.is_published,
        })
    }
}

// ============================================================================
// Public handlers
// ============================================================================

/// List published courses.
///
/// GET /api/courses
pub async fn list_published(State(state): State<AppState>) -> Result<Json<Vec<Course>>> {
    let courses = state.storage().list_published_courses().await?;
    Ok(Json(courses))
}

/// Get one published course.
///
/// GET /api/courses/{id}
pub async fn get_published(
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<Course>> {
    let course = state
        .storage()
        .get_course(id)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| ApiError::NotFound("Course".to_owned()))?;

    Ok(Json(course))
}

// ============================================================================
// Admin handlers
// ============================================================================

/// List all courses, published or not.
///
/// GET /api/admin/courses
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Course>>> {
    let courses = state.storage().list_courses().await?;
    Ok(Json(courses))
}

/// Get one course regardless of publish state.
///
/// GET /api/admin/courses/{id}
pub async fn get_any(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CourseId>,
) -> Result<Json<Course>> {
    let course = state
        .storage()
        .get_course(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course".to_owned()))?;

    Ok(Json(course))
}

/// Create a course.
///
/// POST /api/admin/courses
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<CreateCoursePayload>,
) -> Result<Json<Course>> {
    let new_course = payload.validate().map_err(ApiError::Validation)?;
    let course = state.storage().create_course(new_course).await?;

    tracing::info!(course_id = %course.id, "course created");
    Ok(Json(course))
}

/// Partially update a course.
///
/// PUT /api/admin/courses/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CourseId>,
    Json(payload): Json<UpdateCoursePayload>,
) -> Result<Json<Course>> {
    let changes = payload.validate().map_err(ApiError::Validation)?;
    let course = state
        .storage()
        .update_course(id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course".to_owned()))?;

    Ok(Json(course))
}

/// Delete a course.
///
/// DELETE /api/admin/courses/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CourseId>,
) -> Result<Json<Value>> {
    let deleted = state.storage().delete_course(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Course".to_owned()));
    }

    tracing::info!(course_id = %id, "course deleted");
    Ok(Json(json!({ "success": true })))
}
