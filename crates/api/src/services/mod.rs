//! Business logic services.
//!
//! Services sit between the HTTP handlers and the storage layer. Handlers
//! construct them per-request over a borrowed [`crate::storage::Storage`];
//! they carry no state of their own.

pub mod auth;

pub use auth::{AuthError, AuthService};
