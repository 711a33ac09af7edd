//! REST client for the catalog backend.
//!
//! The backend exposes flat, verb-named endpoints (`get_all_users`,
//! `toggle_product_status`, ...) under a single base URL. Requests are either
//! JSON bodies or multipart forms; every response is JSON carrying a
//! `message` string that discriminates the business outcome.
//!
//! Transport problems surface as [`ApiError`]. Endpoint wrappers interpret
//! the `message` and turn unexpected answers into
//! [`ConsoleError::Rejected`](crate::error::ConsoleError::Rejected).

mod auth;
mod client;
mod products;
mod reviews;
mod taxonomy;
pub mod types;
mod users;

pub use auth::{LoginOutcome, LoginRole};
pub use client::ApiClient;
pub use products::{AssignOutcome, ProductDetails, ProductImage, ProductPage};
pub use reviews::ReviewPage;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// Failed to parse the response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}
