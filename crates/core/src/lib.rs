//! Barrel + Verse core - shared types library.
//!
//! This crate provides common types used across the Barrel + Verse
//! components:
//! - `api` - REST backend (auth, catalogue, purchases)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and the
//!   closed catalogue/purchase enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
