//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! # Password from the environment
//! CONSOLE_PASSWORD=... catalog-admin login -e admin@example.com
//!
//! # Password typed on stdin
//! catalog-admin login -e admin@example.com
//!
//! catalog-admin whoami
//! catalog-admin logout
//! ```

use secrecy::SecretString;

use catalog_admin::api::LoginRole;
use catalog_admin::forms::LoginForm;
use catalog_admin::screens::{LoginResult, LoginScreen};
use catalog_admin_core::AdminId;

use super::{CliError, Context, read_line};
use crate::output;

/// Sign in and store the session marker.
///
/// # Errors
///
/// Returns error on invalid input, transport failure or a refused login.
pub async fn login(
    ctx: &Context,
    email: &str,
    password: Option<String>,
    as_user: bool,
) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => {
            output::note("Password:");
            read_line()?
        }
    };
    let role = if as_user {
        LoginRole::User
    } else {
        LoginRole::Admin
    };

    let form = LoginForm::new(email, SecretString::from(password));
    let screen = LoginScreen::new(ctx.console.clone(), role);
    match screen.submit(&form).await? {
        LoginResult::SignedIn { admin_id, landing } => {
            tracing::info!(admin_id = %admin_id, landing, "Session stored");
            output::success(&format!("Signed in as {admin_id}."));
            Ok(())
        }
        LoginResult::Refused(outcome) => Err(CliError::Usage(outcome.user_text())),
    }
}

/// Clear the session marker.
///
/// # Errors
///
/// Returns error if the session store cannot be cleared.
pub fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.console.logout()?;
    output::success("Signed out.");
    Ok(())
}

/// Print the signed-in admin id.
///
/// # Errors
///
/// Returns `Unauthenticated` when no marker is stored.
pub fn whoami(ctx: &Context) -> Result<(), CliError> {
    let admin_id = ctx.console.admin_id()?;
    let mut pairs = vec![("Admin", admin_id.to_string())];
    if let Some(path) = &ctx.console.config().session_file {
        pairs.push(("Session file", path.display().to_string()));
    }
    pairs.push(("Backend", ctx.console.config().api_url.to_string()));
    output::fields(&pairs);
    Ok(())
}

/// Confirm an admin's email address.
///
/// # Errors
///
/// Returns error on transport failure or an unexpected answer.
pub async fn confirm_email(ctx: &Context, admin_id: &str) -> Result<(), CliError> {
    let screen = LoginScreen::new(ctx.console.clone(), LoginRole::Admin);
    screen.confirm_email(&AdminId::new(admin_id)).await?;
    output::success("Email confirmed. You can log in now.");
    Ok(())
}
