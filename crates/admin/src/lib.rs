//! Catalog Admin console library.
//!
//! This crate provides the admin console as a library: everything a front
//! end needs to drive the catalog backend, without any rendering.
//!
//! # Security
//!
//! The session marker is the only authentication signal the backend
//! checks. Anyone holding a console configured with a marker acts as that
//! admin, so keep `CONSOLE_SESSION_FILE` private to the operator.
//!
//! # Modules
//!
//! - [`api`] - REST client for the catalog backend
//! - [`list`] - Paged entity lists with local search and in-place mutations
//! - [`popup`] - Product and review overlay slots
//! - [`session`] - Session marker storage and the route gate
//! - [`routing`] - Route table, navigator and screen reuse
//! - [`forms`] - Client-side validation
//! - [`screens`] - Screen services built on the above
//! - [`state`] - The shared [`Console`](state::Console) context

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod confirm;
pub mod error;
pub mod forms;
pub mod list;
pub mod popup;
pub mod routing;
pub mod screens;
pub mod session;
pub mod state;
pub mod table;

pub use config::ConsoleConfig;
pub use error::ConsoleError;
pub use state::Console;
