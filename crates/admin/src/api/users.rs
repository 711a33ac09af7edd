//! User endpoints.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use catalog_admin_core::types::de::lenient_string;
use catalog_admin_core::{User, UserId, UserStatus};

use super::ApiClient;
use super::types::{MessageResponse, messages, require_message};
use crate::error::ConsoleError;

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct UserDetailsResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(default)]
    user: Option<User>,
}

impl ApiClient {
    /// Every registered user.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an unexpected message.
    #[instrument(skip(self))]
    pub async fn all_users(&self) -> Result<Vec<User>, ConsoleError> {
        let response: UsersResponse = self.get("get_all_users").await?;
        require_message("load users", &response.message, messages::USERS_RETRIEVED)?;
        Ok(response.users)
    }

    /// One user's profile, or `None` when unknown.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure.
    #[instrument(skip(self))]
    pub async fn user_details(&self, userid: &UserId) -> Result<Option<User>, ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            userid: &'a UserId,
        }
        let response: UserDetailsResponse =
            self.post_json("get_user_details", &Body { userid }).await?;
        if response.message == messages::YES {
            Ok(response.user)
        } else {
            warn!(message = %response.message, "User details not found");
            Ok(None)
        }
    }

    /// Set a user's status.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an unexpected message.
    #[instrument(skip(self))]
    pub async fn set_user_status(
        &self,
        userid: &UserId,
        status: UserStatus,
    ) -> Result<(), ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            userid: &'a UserId,
            status: UserStatus,
        }
        let response: MessageResponse = self
            .post_json("toggle_user_status", &Body { userid, status })
            .await?;
        response.require("update user status", messages::USER_STATUS_UPDATED)?;
        info!(userid = %userid, status = %status, "User status updated");
        Ok(())
    }

    /// Remove a user account.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an unexpected message.
    #[instrument(skip(self))]
    pub async fn remove_user(&self, userid: &UserId) -> Result<(), ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            userid: &'a UserId,
        }
        let response: MessageResponse = self.post_json("remove_user", &Body { userid }).await?;
        response.require("remove user", messages::USER_REMOVED)?;
        info!(userid = %userid, "User removed");
        Ok(())
    }
}
