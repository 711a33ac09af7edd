//! Wire types shared by several endpoints.

use serde::Deserialize;

use catalog_admin_core::types::de::lenient_string;

use crate::error::ConsoleError;

/// Success messages the backend uses, one per operation.
pub mod messages {
    pub const FOUND: &str = "found";
    pub const YES: &str = "yes";
    pub const SUCCESS: &str = "success";
    pub const DELETED: &str = "deleted";
    pub const USERS_RETRIEVED: &str = "Users retrieved successfully";
    pub const REVIEWS_RETRIEVED: &str = "Reviews retrieved successfully";
    pub const PRODUCT_STATUS_UPDATED: &str = "Product status updated successfully";
    pub const USER_STATUS_UPDATED: &str = "User status updated successfully";
    pub const USER_REMOVED: &str = "User removed successfully";
    pub const LOGIN_SUCCESSFUL: &str = "Login successful";
    pub const CONFIRM_EMAIL: &str = "Please confirm the email";
    pub const NO_USER: &str = "No user found";
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
    pub const EMAIL_AUTHENTICATED: &str = "Email is authenticated";
    pub const ASSIGNED: &str = "assigned";
    pub const ALREADY_YOURS: &str = "already_yours";
    pub const PRODUCT_NOT_FOUND: &str = "product_not_found";
}

/// Response that only carries the outcome message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
}

impl MessageResponse {
    /// Succeed only when the backend answered with `expected`.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Rejected` carrying the actual message otherwise.
    pub fn require(self, operation: &'static str, expected: &str) -> Result<(), ConsoleError> {
        require_message(operation, &self.message, expected)
    }
}

/// Compare a response message with the success message of an operation.
pub(crate) fn require_message(
    operation: &'static str,
    actual: &str,
    expected: &str,
) -> Result<(), ConsoleError> {
    if actual == expected {
        Ok(())
    } else {
        tracing::warn!(operation, message = actual, "Backend rejected operation");
        Err(ConsoleError::Rejected {
            operation,
            message: actual.to_string(),
        })
    }
}
