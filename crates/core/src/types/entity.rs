//! Traits shared by every catalog entity record.

use serde::{Deserialize, Serialize};

/// The kinds of entity the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Product,
    Review,
    User,
    Category,
    Technology,
    UseCase,
}

impl EntityKind {
    /// Human label used in prompts and log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Review => "review",
            Self::User => "user",
            Self::Category => "category",
            Self::Technology => "technology",
            Self::UseCase => "use case",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A backend record identified by a unique string id.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Kind of the record.
    fn kind(&self) -> EntityKind;

    /// Unique id of the record.
    fn entity_id(&self) -> &str;

    /// Display name used in confirmation prompts.
    fn display_name(&self) -> &str;
}

/// A record that takes part in local list search.
pub trait Searchable {
    /// The fixed set of fields a search query is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

/// Case-insensitive substring match of `query` against the record's search fields.
///
/// A blank query matches everything.
#[must_use]
pub fn matches_query<T: Searchable + ?Sized>(record: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, &'static str);

    impl Searchable for Named {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.0, self.1]
        }
    }

    #[test]
    fn test_blank_query_matches() {
        assert!(matches_query(&Named("a", "b"), ""));
        assert!(matches_query(&Named("a", "b"), "   "));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let n = Named("VectorStore", "MIT");
        assert!(matches_query(&n, "vector"));
        assert!(matches_query(&n, " mit "));
        assert!(!matches_query(&n, "apache"));
    }
}
