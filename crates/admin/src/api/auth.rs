//! Login and email confirmation endpoints.

use reqwest::multipart::Form;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use catalog_admin_core::types::de::lenient_string;
use catalog_admin_core::{AdminId, Email};

use super::ApiClient;
use super::types::{MessageResponse, messages};
use crate::error::ConsoleError;

/// Which login endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginRole {
    #[default]
    Admin,
    User,
}

impl LoginRole {
    const fn endpoint(self) -> &'static str {
        match self {
            Self::Admin => "admin_log_in",
            Self::User => "user_log_in",
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(default)]
    adminid: Option<AdminId>,
    #[serde(default)]
    userid: Option<AdminId>,
}

/// Business outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted; the id becomes the session marker.
    SignedIn(AdminId),
    /// Account exists but the email is not confirmed yet.
    ConfirmEmail,
    /// No account with this email.
    NoUser,
    /// Wrong password.
    InvalidCredentials,
    /// Any other message.
    Unexpected(String),
}

impl LoginOutcome {
    fn from_response(role: LoginRole, response: LoginResponse) -> Self {
        match response.message.as_str() {
            messages::LOGIN_SUCCESSFUL => {
                let id = match role {
                    LoginRole::Admin => response.adminid.or(response.userid),
                    LoginRole::User => response.userid.or(response.adminid),
                };
                match id.filter(|id| !id.is_empty()) {
                    Some(id) => Self::SignedIn(id),
                    None => Self::Unexpected("login succeeded without an id".to_string()),
                }
            }
            messages::CONFIRM_EMAIL => Self::ConfirmEmail,
            messages::NO_USER => Self::NoUser,
            messages::INVALID_CREDENTIALS => Self::InvalidCredentials,
            _ => Self::Unexpected(response.message),
        }
    }

    /// Text shown to the operator.
    #[must_use]
    pub fn user_text(&self) -> String {
        match self {
            Self::SignedIn(_) => "Login successful.".to_string(),
            Self::ConfirmEmail => "Please confirm your email before logging in.".to_string(),
            Self::NoUser => "No user found with this email.".to_string(),
            Self::InvalidCredentials => "Incorrect password. Please try again.".to_string(),
            Self::Unexpected(message) => format!("Unexpected error: {message}"),
        }
    }
}

impl ApiClient {
    /// Submit credentials.
    ///
    /// # Errors
    ///
    /// Returns error only on transport failure; refusals are outcomes.
    #[instrument(skip(self, password), fields(role = ?role, email = %email))]
    pub async fn log_in(
        &self,
        role: LoginRole,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginOutcome, ConsoleError> {
        let form = Form::new()
            .text("emailaddress", email.as_str().to_string())
            .text("password", password.expose_secret().to_string());

        let response: LoginResponse = self.post_form(role.endpoint(), form).await?;
        let outcome = LoginOutcome::from_response(role, response);
        match &outcome {
            LoginOutcome::SignedIn(id) => info!(admin_id = %id, "Login successful"),
            other => warn!(outcome = ?other, "Login refused"),
        }
        Ok(outcome)
    }

    /// Confirm an admin's email address from the sign-up link.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or any other answer than
    /// "Email is authenticated".
    #[instrument(skip(self))]
    pub async fn confirm_email(&self, admin_id: &AdminId) -> Result<(), ConsoleError> {
        let form = Form::new().text("adminid", admin_id.to_string());
        let response: MessageResponse = self
            .post_form("email_auth_admin_click_email_confirmation", form)
            .await?;
        response.require("confirm email", messages::EMAIL_AUTHENTICATED)?;
        info!(admin_id = %admin_id, "Email confirmed");
        Ok(())
    }
}
