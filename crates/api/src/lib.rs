//! Barrel + Verse API library.
//!
//! This crate provides the backend functionality as a library, allowing it
//! to be tested end-to-end and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod validation;
