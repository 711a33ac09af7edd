use tracing::{info, instrument, warn};

use catalog_admin_core::AdminId;

use crate::api::{LoginOutcome, LoginRole};
use crate::error::ConsoleError;
use crate::forms::LoginForm;
use crate::routing::LANDING_ROUTE;
use crate::state::Console;

/// Result of a login attempt the backend answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    /// Marker stored; go to `landing`.
    SignedIn {
        admin_id: AdminId,
        landing: &'static str,
    },
    /// Backend refused; show [`LoginOutcome::user_text`] and stay.
    Refused(LoginOutcome),
}

/// The login screen.
#[derive(Debug, Clone)]
pub struct LoginScreen {
    console: Console,
    role: LoginRole,
}

impl LoginScreen {
    #[must_use]
    pub const fn new(console: Console, role: LoginRole) -> Self {
        Self { console, role }
    }

    /// Validate the form, log in and store the session marker.
    ///
    /// # Errors
    ///
    /// Returns `Validation` before any request when the form is invalid,
    /// a transport error, or a session error when the marker cannot be stored.
    #[instrument(skip(self, form), fields(role = ?self.role))]
    pub async fn submit(&self, form: &LoginForm) -> Result<LoginResult, ConsoleError> {
        let email = form.validate()?;
        let outcome = self
            .console
            .api()
            .log_in(self.role, &email, &form.password)
            .await?;

        match outcome {
            LoginOutcome::SignedIn(admin_id) => {
                self.console.gate().sign_in(&admin_id)?;
                info!(admin_id = %admin_id, "Signed in");
                Ok(LoginResult::SignedIn {
                    admin_id,
                    landing: LANDING_ROUTE,
                })
            }
            other => {
                warn!(outcome = ?other, "Login refused");
                Ok(LoginResult::Refused(other))
            }
        }
    }

    /// Ask the backend to mark the admin's email as confirmed.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an unexpected message.
    pub async fn confirm_email(&self, admin_id: &AdminId) -> Result<(), ConsoleError> {
        self.console.api().confirm_email(admin_id).await
    }
}
