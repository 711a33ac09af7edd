//! Core types for the catalog admin console.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! entity records returned by the catalog backend.

pub mod de;
pub mod email;
pub mod entity;
pub mod id;
pub mod product;
pub mod review;
pub mod status;
pub mod taxonomy;
pub mod user;

pub use email::{Email, EmailError};
pub use entity::{Entity, EntityKind, Searchable, matches_query};
pub use id::*;
pub use product::Product;
pub use review::Review;
pub use status::*;
pub use taxonomy::{TaxonomyEntry, TaxonomyKind};
pub use user::User;
