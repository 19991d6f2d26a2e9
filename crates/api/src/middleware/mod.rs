//! Request middleware and extractors.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth, clear_current_user, set_current_user};
pub use session::{SESSION_COOKIE_NAME, session_layer};
