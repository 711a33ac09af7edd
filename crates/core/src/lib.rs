//! Catalog Admin Core - Shared types library.
//!
//! This crate provides common types used across all catalog admin components:
//! - `admin` - Admin console library (API client, list state, popups, session gate)
//! - `cli` - Command-line front end for the console
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, emails, statuses and the catalog entity records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
