//! Authentication routes.
//!
//! Registration and login both establish a session carrying the user's
//! identity. Responses never include password material -
//! [`UserResponse`] has no hash field at all.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use barrel_verse_core::Email;

use crate::error::{ApiError, Result};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, UserResponse};
use crate::services::AuthService;
use crate::state::AppState;
use crate::validation::{FieldError, Validator};

/// Registration payload. Fields are optional at the serde level so missing
/// ones surface as field errors rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl RegisterPayload {
    fn validate(self) -> std::result::Result<(Email, String, String), Vec<FieldError>> {
        let mut v = Validator::new();
        let email = v.require_email("email", self.email);
        let password = v.require_password("password", self.password);
        let name = v.require_text("name", self.name);

        match (v.finish(), email, password, name) {
            (Ok(()), Some(email), Some(password), Some(name)) => Ok((email, password, name)),
            (Err(errors), ..) => Err(errors),
            _ => Err(Vec::new()),
        }
    }
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginPayload {
    fn validate(self) -> std::result::Result<(Email, String), Vec<FieldError>> {
        let mut v = Validator::new();
        let email = v.require_email("email", self.email);
        let password = v.require_text("password", self.password);

        match (v.finish(), email, password) {
            (Ok(()), Some(email), Some(password)) => Ok((email, password)),
            (Err(errors), ..) => Err(errors),
            _ => Err(Vec::new()),
        }
    }
}

/// Register a new user and start a session.
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<UserResponse>> {
    let (email, password, name) = payload.validate().map_err(ApiError::Validation)?;

    let auth = AuthService::new(state.storage());
    let user = auth.register(email, &password, name).await?;

    set_current_user(
        &session,
        &CurrentUser {
            id: user.id,
            email: user.email.clone(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(Json(user.into()))
}

/// Login with email and password, starting a session.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<UserResponse>> {
    let (email, password) = payload.validate().map_err(ApiError::Validation)?;

    let auth = AuthService::new(state.storage());
    let user = auth.login(&email, &password).await?;

    set_current_user(
        &session,
        &CurrentUser {
            id: user.id,
            email: user.email.clone(),
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// Destroy the session.
///
/// POST /api/auth/logout
///
/// A session-store failure here is a 500, not a silent success - the
/// caller must know the cookie may still be live.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_user(&session).await?;
    session
        .flush()
        .await
        .map_err(|e| ApiError::Internal(format!("session destruction failed: {e}")))?;

    Ok(Json(json!({ "success": true })))
}

/// Get the currently logged-in user.
///
/// GET /api/auth/me
///
/// 404 when the session's user id no longer resolves (account deleted
/// since login).
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<UserResponse>> {
    let user = state
        .storage()
        .get_user(current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".to_owned()))?;

    Ok(Json(user.into()))
}
