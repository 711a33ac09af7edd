use catalog_admin_core::TaxonomyKind;

use super::{ValidationErrors, require};

/// Create/rename form for a category, technology or use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyForm {
    pub kind: TaxonomyKind,
    pub name: String,
}

impl TaxonomyForm {
    #[must_use]
    pub fn new(kind: TaxonomyKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Check the name and return it trimmed.
    ///
    /// # Errors
    ///
    /// Returns a failure on the kind's name field when the name is blank or
    /// shorter than the kind's minimum.
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let field = self.kind.name_field();
        let name = self.name.trim();
        if require(&mut errors, field, name) && name.chars().count() < self.kind.min_name_len() {
            errors.add(
                field,
                format!("must be at least {} characters", self.kind.min_name_len()),
            );
        }
        errors.into_result().map(|()| name.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length_per_kind() {
        assert_eq!(
            TaxonomyForm::new(TaxonomyKind::Category, " AI ")
                .validate()
                .unwrap(),
            "AI"
        );
        let errors = TaxonomyForm::new(TaxonomyKind::UseCase, "AI")
            .validate()
            .unwrap_err();
        assert_eq!(errors.field("usecaseName"), ["must be at least 3 characters"]);
    }

    #[test]
    fn test_blank_name() {
        let errors = TaxonomyForm::new(TaxonomyKind::Technology, "  ")
            .validate()
            .unwrap_err();
        assert_eq!(errors.field("technologyName"), ["is required"]);
    }
}
