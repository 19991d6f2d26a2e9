//! Authentication extractors.
//!
//! Two gates with deliberately different costs:
//!
//! - [`RequireAuth`] trusts the session record outright - no storage hit.
//! - [`RequireAdmin`] re-resolves the user from storage on every request, so
//!   revoking the admin flag takes effect immediately rather than at next
//!   login.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::ApiError;
use crate::models::{CurrentUser, User, session_keys};
use crate::state::AppState;

/// Extractor that requires a logged-in user.
///
/// Rejects with 401 when no session identity is present.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(ApiError::Unauthorized)?;

        // A store read failure is a backend error, not a missing login
        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(Self(user))
    }
}

/// Extractor that requires a logged-in admin.
///
/// Rejects with 401 when not logged in, 403 when logged in but not an
/// admin - including when the session's user has since been deleted.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(ApiError::Unauthorized)?;

        let current: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        let user = state
            .storage()
            .get_user(current.id)
            .await?
            .ok_or(ApiError::Forbidden)?;

        if !user.is_admin {
            return Err(ApiError::Forbidden);
        }

        Ok(Self(user))
    }
}

/// Set the current user in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Clear the current user from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::Request;
    use tower_sessions::session::{Id, Record};
    use tower_sessions::{SessionStore, session_store};

    /// Session store whose backend is unreachable.
    #[derive(Debug, Clone)]
    struct FailingStore;

    #[async_trait]
    impl SessionStore for FailingStore {
        async fn create(&self, _record: &mut Record) -> session_store::Result<()> {
            Err(session_store::Error::Backend("store offline".to_owned()))
        }

        async fn save(&self, _record: &Record) -> session_store::Result<()> {
            Err(session_store::Error::Backend("store offline".to_owned()))
        }

        async fn load(&self, _id: &Id) -> session_store::Result<Option<Record>> {
            Err(session_store::Error::Backend("store offline".to_owned()))
        }

        async fn delete(&self, _id: &Id) -> session_store::Result<()> {
            Err(session_store::Error::Backend("store offline".to_owned()))
        }
    }

    fn parts_with_session(session: Session) -> Parts {
        let (mut parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        parts.extensions.insert(session);
        parts
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        // An empty session never touches the store
        let session = Session::new(None, Arc::new(FailingStore), None);
        let mut parts = parts_with_session(session);

        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_store_failure_is_a_session_error_not_unauthorized() {
        // A live session id forces a load, which the backend refuses
        let session = Session::new(Some(Id::default()), Arc::new(FailingStore), None);
        let mut parts = parts_with_session(session);

        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Session(_))));
    }
}
