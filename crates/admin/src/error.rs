//! Unified error handling for the console.
//!
//! Three failure families exist and are kept apart:
//! - validation errors, caught before any request is sent ([`ValidationErrors`]);
//! - business outcomes, where the backend answered but with a `message` other
//!   than the one that means success ([`ConsoleError::Rejected`]);
//! - transport errors, any network failure or non-2xx status ([`ApiError`]).
//!
//! None of them is fatal. Each is scoped to the action that triggered it and
//! leaves unrelated state untouched. Nothing is retried.

use thiserror::Error;

use catalog_admin_core::EntityKind;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::forms::ValidationErrors;
use crate::session::SessionError;

/// Application-level error type for the console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Backend request failed at the transport level.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Form input failed validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Backend answered with a message other than the success message.
    #[error("{operation} rejected: {message}")]
    Rejected {
        /// Operation that was attempted.
        operation: &'static str,
        /// Message returned by the backend.
        message: String,
    },

    /// The entity is not among the currently loaded ones.
    #[error("{kind} not loaded: {id}")]
    NotFound {
        /// Kind of entity looked up.
        kind: EntityKind,
        /// Id that was looked up.
        id: String,
    },

    /// The action is not allowed in the current state.
    #[error("Not allowed: {0}")]
    NotAllowed(String),

    /// Navigation to a protected screen was refused by the session gate.
    #[error("Not signed in")]
    Unauthenticated,
}

impl ConsoleError {
    /// Text shown to the operator for this failure.
    ///
    /// Transport errors collapse to a generic message; the details go to the log.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(_) => "Server error. Please try again.".to_string(),
            Self::Config(e) => e.to_string(),
            Self::Validation(e) => e.to_string(),
            Self::Session(_) => "Session storage is unavailable.".to_string(),
            Self::Rejected { operation, .. } => format!("Failed to {operation}. Please try again."),
            Self::NotFound { kind, .. } => format!("{} not found.", capitalize(kind.label())),
            Self::NotAllowed(reason) => reason.clone(),
            Self::Unauthenticated => "Please log in first.".to_string(),
        }
    }

    /// Whether the failure came from the transport rather than the backend's answer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_error_display() {
        let err = ConsoleError::Rejected {
            operation: "delete product",
            message: "not deleted".to_string(),
        };
        assert_eq!(err.to_string(), "delete product rejected: not deleted");

        let err = ConsoleError::NotFound {
            kind: EntityKind::Product,
            id: "p1".to_string(),
        };
        assert_eq!(err.to_string(), "product not loaded: p1");
    }

    #[test]
    fn test_user_messages() {
        let err = ConsoleError::Rejected {
            operation: "update product status",
            message: "nope".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "Failed to update product status. Please try again."
        );

        let err = ConsoleError::NotFound {
            kind: EntityKind::UseCase,
            id: "u".to_string(),
        };
        assert_eq!(err.user_message(), "Use case not found.");
        assert!(!err.is_transport());
    }
}
