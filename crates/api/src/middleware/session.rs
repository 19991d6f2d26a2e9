//! Session middleware configuration.
//!
//! One cookie-session layer over whichever [`SessionStore`] startup picked:
//! `PostgresStore` when a database is configured, `MemoryStore` otherwise.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::Config;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bv_session";

/// Session expiry in seconds (7 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over the given store.
///
/// Cookies are `HttpOnly`, `SameSite=Lax`, path `/`, and `Secure` only in
/// production so local plain-HTTP development keeps working.
pub fn session_layer<S: SessionStore>(store: S, config: &Config) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.environment.is_production())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
