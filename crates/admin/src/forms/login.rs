use secrecy::{ExposeSecret, SecretString};

use catalog_admin_core::Email;

use super::{ValidationErrors, require};

const MIN_PASSWORD_LEN: usize = 6;

/// Credentials typed into the login screen.
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    /// Check both fields and return the parsed email.
    ///
    /// # Errors
    ///
    /// Returns per-field failures for a missing or malformed email and a
    /// password shorter than six characters.
    pub fn validate(&self) -> Result<Email, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = if require(&mut errors, "email", &self.email) {
            match Email::parse(&self.email) {
                Ok(email) => Some(email),
                Err(e) => {
                    errors.add("email", e.to_string());
                    None
                }
            }
        } else {
            None
        };

        let password = self.password.expose_secret();
        if password.is_empty() {
            errors.add("password", "is required");
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        match (email, errors.is_empty()) {
            (Some(email), true) => Ok(email),
            _ => Err(errors),
        }
    }
}
