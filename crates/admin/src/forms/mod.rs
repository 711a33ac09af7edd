//! Client-side form validation.
//!
//! Every form is checked before a request is built. Failures are collected
//! per field so a caller can show each message next to its input; nothing
//! is sent while any field is invalid.

mod login;
mod product;
mod taxonomy;

pub use login::LoginForm;
pub use product::{ProductForm, USE_CASE_SUGGESTIONS, suggest_use_cases};
pub use taxonomy::TaxonomyForm;

use std::collections::BTreeMap;
use std::fmt;

/// Validation failures keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for one field.
    #[must_use]
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Whether `field` has any failure.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.fields.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// `Ok(())` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Record "is required" when `value` is blank. Returns whether it was present.
pub(crate) fn require(errors: &mut ValidationErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, "is required");
        false
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_every_failure() {
        let mut errors = ValidationErrors::new();
        errors.add("website", "must start with http:// or https://");
        errors.add("name", "is required");
        errors.add("name", "is too short");
        assert_eq!(
            errors.to_string(),
            "name: is required; name: is too short; website: must start with http:// or https://"
        );
        assert_eq!(errors.field("name").len(), 2);
        assert!(errors.field("license").is_empty());
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        assert!(!require(&mut errors, "name", "   "));
        assert!(errors.has("name"));
        assert!(errors.into_result().is_err());
    }
}
