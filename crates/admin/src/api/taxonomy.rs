//! Category, technology and use-case endpoints.
//!
//! The three taxonomies share one contract that differs only in endpoint and
//! field names, which [`TaxonomyKind`] supplies.

use reqwest::multipart::Form;
use serde_json::Value;
use tracing::{info, instrument, warn};

use catalog_admin_core::{AdminId, TaxonomyEntry, TaxonomyId, TaxonomyKind};

use super::types::MessageResponse;
use super::{ApiClient, ApiError};
use crate::error::ConsoleError;

/// Whether a taxonomy mutation message reads as success.
fn is_success_message(message: &str) -> bool {
    let lower = message.trim().to_ascii_lowercase();
    lower.contains("success") || matches!(lower.as_str(), "created" | "updated" | "deleted")
}

fn check(operation: &'static str, response: MessageResponse) -> Result<(), ConsoleError> {
    if is_success_message(&response.message) {
        Ok(())
    } else {
        warn!(operation, message = %response.message, "Backend rejected operation");
        Err(ConsoleError::Rejected {
            operation,
            message: response.message,
        })
    }
}

/// Pull the entry list out of a `get_<plural>` response.
fn parse_entries(kind: TaxonomyKind, mut body: Value) -> Result<Vec<TaxonomyEntry>, ApiError> {
    let list = match body.get_mut(kind.list_key()).map(Value::take) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(list) => list,
    };
    let mut entries: Vec<TaxonomyEntry> = serde_json::from_value(list)
        .map_err(|e| ApiError::Parse(format!("{}: {e}", kind.list_endpoint())))?;
    for entry in &mut entries {
        entry.taxonomy = kind;
    }
    Ok(entries)
}

impl ApiClient {
    /// List every entry of a taxonomy.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a malformed list.
    #[instrument(skip(self))]
    pub async fn taxonomy_list(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>, ConsoleError> {
        let body: Value = self.get(kind.list_endpoint()).await?;
        if let Some(message) = body.get("message").and_then(Value::as_str) {
            tracing::debug!(message, "Taxonomy list answered");
        }
        Ok(parse_entries(kind, body)?)
    }

    /// Create an entry.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success message.
    #[instrument(skip(self))]
    pub async fn create_taxonomy(
        &self,
        kind: TaxonomyKind,
        admin: &AdminId,
        name: &str,
    ) -> Result<(), ConsoleError> {
        let form = Form::new()
            .text("adminid", admin.to_string())
            .text(kind.name_field(), name.to_string());
        let response: MessageResponse = self
            .post_form(&format!("create_{}", kind.stem()), form)
            .await?;
        check("create entry", response)?;
        info!(kind = %kind, name, "Taxonomy entry created");
        Ok(())
    }

    /// Rename an entry.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success message.
    #[instrument(skip(self))]
    pub async fn update_taxonomy(
        &self,
        kind: TaxonomyKind,
        admin: &AdminId,
        id: &TaxonomyId,
        name: &str,
    ) -> Result<(), ConsoleError> {
        let form = Form::new()
            .text("adminid", admin.to_string())
            .text(kind.id_field(), id.to_string())
            .text(kind.name_field(), name.to_string());
        let response: MessageResponse = self
            .post_form(&format!("update_{}", kind.stem()), form)
            .await?;
        check("update entry", response)?;
        info!(kind = %kind, id = %id, name, "Taxonomy entry updated");
        Ok(())
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success message.
    #[instrument(skip(self))]
    pub async fn delete_taxonomy(
        &self,
        kind: TaxonomyKind,
        admin: &AdminId,
        id: &TaxonomyId,
    ) -> Result<(), ConsoleError> {
        let form = Form::new()
            .text("adminid", admin.to_string())
            .text(kind.id_field(), id.to_string());
        let response: MessageResponse = self
            .post_form(&format!("delete_{}", kind.stem()), form)
            .await?;
        check("delete entry", response)?;
        info!(kind = %kind, id = %id, "Taxonomy entry deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_messages() {
        assert!(is_success_message("Category created successfully"));
        assert!(is_success_message("deleted"));
        assert!(!is_success_message("Category already exists"));
        assert!(!is_success_message(""));
    }

    #[test]
    fn test_parse_entries_tags_kind() {
        let body = json!({
            "message": "found",
            "usecases": [{"usecaseid": 3, "usecaseName": "OCR", "createdDate": "2024-01-01"}]
        });
        let entries = parse_entries(TaxonomyKind::UseCase, body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].taxonomy, TaxonomyKind::UseCase);
        assert_eq!(entries[0].id.as_str(), "3");
        assert_eq!(entries[0].name, "OCR");
    }

    #[test]
    fn test_parse_entries_missing_list() {
        let entries = parse_entries(TaxonomyKind::Category, json!({"message": "none"})).unwrap();
        assert!(entries.is_empty());

        let result = parse_entries(TaxonomyKind::Category, json!({"categories": "oops"}));
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
