use serde::{Deserialize, Serialize};

use crate::api::ProductDetails;

use super::{ValidationErrors, require};

/// Use cases offered by the product editor's picker.
pub const USE_CASE_SUGGESTIONS: &[&str] = &[
    "Customer Support",
    "Content Generation",
    "Data Analysis",
    "Image Recognition",
    "Natural Language Processing",
    "Chatbot",
    "Voice Assistant",
    "Translation",
    "Sentiment Analysis",
    "Code Generation",
    "Video Editing",
    "Photo Editing",
    "File Management",
    "Project Management",
    "CRM",
    "E-commerce",
    "Marketing Automation",
];

/// Suggestions containing `input` (case-insensitive), minus those already picked.
///
/// Blank input suggests nothing.
#[must_use]
pub fn suggest_use_cases(input: &str, selected: &[String]) -> Vec<&'static str> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    USE_CASE_SUGGESTIONS
        .iter()
        .copied()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .filter(|candidate| !selected.iter().any(|s| s == candidate))
        .collect()
}

/// Product create/edit form.
///
/// Field names on the wire follow the editor's form controls, so the same
/// struct reads a YAML product file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    #[serde(rename = "type", alias = "category")]
    pub category: String,
    pub license: String,
    pub technology: String,
    pub website: String,
    #[serde(rename = "fundingStage", alias = "funding_stage")]
    pub funding_stage: String,
    #[serde(rename = "productdescription", alias = "description")]
    pub description: String,
    #[serde(rename = "documentationlink", alias = "documentation")]
    pub documentation_link: String,
    #[serde(rename = "productfb", alias = "facebook")]
    pub facebook: String,
    #[serde(rename = "productlinkedin", alias = "linkedin")]
    pub linkedin: String,
    #[serde(rename = "isFeatured", alias = "featured")]
    pub is_featured: bool,
    pub founders: Vec<String>,
    #[serde(rename = "baseModels", alias = "base_models")]
    pub base_models: Vec<String>,
    pub deployments: Vec<String>,
    #[serde(rename = "mediaPreviews", alias = "media_previews")]
    pub media_previews: Vec<String>,
    pub repositories: Vec<String>,
    #[serde(rename = "useCases", alias = "use_cases")]
    pub use_cases: Vec<String>,
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme))
}

impl ProductForm {
    /// Populate the editor from a fetched product.
    #[must_use]
    pub fn from_details(details: &ProductDetails) -> Self {
        let product = &details.product;
        Self {
            name: product.productname.clone(),
            category: product.productcategory.clone(),
            license: product.productlicense.clone(),
            technology: product.producttechnology.clone(),
            website: product.productwebsite.clone(),
            funding_stage: product.productfundingstage.clone(),
            description: product.productdescription.clone(),
            documentation_link: product.productdocumentation.clone(),
            facebook: product.productfacebook.clone(),
            linkedin: product.productlinkedin.clone(),
            is_featured: product.is_featured != 0,
            founders: details.founders.clone(),
            base_models: details.base_models.clone(),
            deployments: details.deployments.clone(),
            media_previews: details.media_previews.clone(),
            repositories: details.repositories.clone(),
            use_cases: details.use_cases.clone(),
        }
    }

    /// Check required fields, the website scheme and the required lists.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        require(&mut errors, "name", &self.name);
        require(&mut errors, "type", &self.category);
        require(&mut errors, "license", &self.license);
        require(&mut errors, "technology", &self.technology);
        if require(&mut errors, "website", &self.website) && !is_http_url(&self.website) {
            errors.add("website", "must start with http:// or https://");
        }
        require(&mut errors, "fundingStage", &self.funding_stage);
        require(&mut errors, "productdescription", &self.description);

        for (field, values) in [
            ("founders", &self.founders),
            ("baseModels", &self.base_models),
            ("deployments", &self.deployments),
        ] {
            if non_blank(values).is_empty() {
                errors.add(field, "needs at least one entry");
            }
        }

        errors.into_result()
    }

    /// Add a use case unless it is already picked.
    pub fn select_use_case(&mut self, use_case: &str) -> bool {
        let use_case = use_case.trim();
        if use_case.is_empty() || self.use_cases.iter().any(|u| u == use_case) {
            return false;
        }
        self.use_cases.push(use_case.to_string());
        true
    }

    pub fn remove_use_case(&mut self, use_case: &str) {
        self.use_cases.retain(|u| u != use_case);
    }

    #[must_use]
    pub fn founders(&self) -> Vec<String> {
        non_blank(&self.founders)
    }

    #[must_use]
    pub fn base_models(&self) -> Vec<String> {
        non_blank(&self.base_models)
    }

    #[must_use]
    pub fn deployments(&self) -> Vec<String> {
        non_blank(&self.deployments)
    }

    #[must_use]
    pub fn media_previews(&self) -> Vec<String> {
        non_blank(&self.media_previews)
    }

    #[must_use]
    pub fn repositories(&self) -> Vec<String> {
        non_blank(&self.repositories)
    }

    #[must_use]
    pub fn use_cases(&self) -> Vec<String> {
        non_blank(&self.use_cases)
    }

    /// List fields with their multipart names, blanks dropped.
    #[must_use]
    pub fn list_fields(&self) -> [(&'static str, Vec<String>); 6] {
        [
            ("founders", self.founders()),
            ("useCases", self.use_cases()),
            ("baseModels", self.base_models()),
            ("deployments", self.deployments()),
            ("mediaPreviews", self.media_previews()),
            ("repositories", self.repositories()),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            name: "Vision".to_string(),
            category: "AI".to_string(),
            license: "MIT".to_string(),
            technology: "ML".to_string(),
            website: "https://vision.example".to_string(),
            funding_stage: "Seed".to_string(),
            description: "Sees things".to_string(),
            founders: vec!["Ada".to_string()],
            base_models: vec!["ViT".to_string()],
            deployments: vec!["Cloud".to_string()],
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_website_pattern() {
        let mut form = valid_form();
        form.website = "vision.example".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.field("website"),
            ["must start with http:// or https://"]
        );

        form.website = "http://".to_string();
        assert!(form.validate().is_err());

        form.website = "http://x".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_required_lists_ignore_blanks() {
        let mut form = valid_form();
        form.founders = vec!["  ".to_string()];
        form.deployments.clear();
        let errors = form.validate().unwrap_err();
        assert!(errors.has("founders"));
        assert!(errors.has("deployments"));
        assert!(!errors.has("baseModels"));
    }

    #[test]
    fn test_optional_lists_drop_blanks() {
        let mut form = valid_form();
        form.media_previews = vec![String::new(), " https://img ".to_string()];
        form.repositories = vec![String::new()];
        assert!(form.validate().is_ok());
        assert_eq!(form.media_previews(), vec!["https://img"]);
        assert!(form.repositories().is_empty());
    }

    #[test]
    fn test_deserializes_form_control_names() {
        let form: ProductForm = serde_json::from_value(serde_json::json!({
            "name": "Vision",
            "type": "AI",
            "fundingStage": "Seed",
            "isFeatured": true,
            "baseModels": ["ViT"],
        }))
        .unwrap();
        assert_eq!(form.category, "AI");
        assert_eq!(form.funding_stage, "Seed");
        assert!(form.is_featured);
        assert_eq!(form.base_models, vec!["ViT"]);
    }

    #[test]
    fn test_use_case_picker() {
        let mut form = valid_form();
        assert!(form.select_use_case("Chatbot"));
        assert!(!form.select_use_case("Chatbot"));
        let suggestions = suggest_use_cases("edit", &form.use_cases);
        assert_eq!(suggestions, vec!["Video Editing", "Photo Editing"]);
        assert_eq!(suggest_use_cases("chat", &form.use_cases), Vec::<&str>::new());
        assert!(suggest_use_cases(" ", &[]).is_empty());

        form.remove_use_case("Chatbot");
        assert!(form.use_cases.is_empty());
    }

    #[test]
    fn test_from_details() {
        let details: ProductDetails = serde_json::from_value(serde_json::json!({
            "product": {"productname": "Vision", "productcategory": "AI", "isFeatured": 1},
            "founders": ["Ada"],
            "useCases": ["OCR"],
        }))
        .unwrap();
        let form = ProductForm::from_details(&details);
        assert_eq!(form.name, "Vision");
        assert_eq!(form.category, "AI");
        assert!(form.is_featured);
        assert_eq!(form.founders, vec!["Ada"]);
        assert_eq!(form.use_cases, vec!["OCR"]);
    }
}
