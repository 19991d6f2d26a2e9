//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (probes storage)
//!
//! # Auth
//! POST /api/auth/register          - Register + start session
//! POST /api/auth/login             - Login + start session
//! POST /api/auth/logout            - Destroy session
//! GET  /api/auth/me                - Current user (requires auth)
//!
//! # Public catalogue (published entries only)
//! GET  /api/courses                - List published courses
//! GET  /api/courses/{id}           - Published course detail
//! GET  /api/experiences            - List published experiences
//! GET  /api/experiences/{id}       - Published experience detail
//!
//! # Admin catalogue (requires admin; includes unpublished)
//! GET  /api/admin/courses          - List all courses
//! POST /api/admin/courses          - Create course
//! GET  /api/admin/courses/{id}     - Course detail
//! PUT  /api/admin/courses/{id}     - Partial update
//! DELETE /api/admin/courses/{id}   - Delete
//! GET|POST /api/admin/experiences  - Same pattern
//! GET|PUT|DELETE /api/admin/experiences/{id}
//!
//! # Purchases (requires auth; scoped to the session's user)
//! GET  /api/purchases              - List own purchases
//! POST /api/purchases              - Record a purchase
//! GET  /api/purchases/{id}         - Own purchase detail
//! ```

pub mod auth;
pub mod courses;
pub mod experiences;
pub mod health;
pub mod purchases;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the public course routes router.
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_published))
        .route("/{id}", get(courses::get_published))
}

/// Create the public experience routes router.
pub fn experience_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(experiences::list_published))
        .route("/{id}", get(experiences::get_published))
}

/// Create the admin course routes router.
pub fn admin_course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_all).post(courses::create))
        .route(
            "/{id}",
            get(courses::get_any)
                .put(courses::update)
                .delete(courses::delete),
        )
}

/// Create the admin experience routes router.
pub fn admin_experience_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(experiences::list_all).post(experiences::create))
        .route(
            "/{id}",
            get(experiences::get_any)
                .put(experiences::update)
                .delete(experiences::delete),
        )
}

/// Create the purchase routes router.
pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(purchases::list).post(purchases::create))
        .route("/{id}", get(purchases::get))
}

/// Assemble the full application router over the given session store.
///
/// Generic over the store so the `PostgreSQL`-backed and in-memory session
/// stores both fit; startup picks which one to pass in.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/auth", auth_routes())
        .nest("/api/courses", course_routes())
        .nest("/api/experiences", experience_routes())
        .nest("/api/admin/courses", admin_course_routes())
        .nest("/api/admin/experiences", admin_experience_routes())
        .nest("/api/purchases", purchase_routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
