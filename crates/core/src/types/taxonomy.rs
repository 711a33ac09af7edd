//! Taxonomy records: categories, technologies and use cases.
//!
//! The three taxonomies share one record shape and differ only in their
//! endpoint names and form field names, which [`TaxonomyKind`] describes.

use serde::{Deserialize, Serialize};

use super::de::lenient_string;
use super::entity::{Entity, EntityKind, Searchable};
use super::id::TaxonomyId;

/// Which taxonomy a record or request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    Category,
    Technology,
    UseCase,
}

impl TaxonomyKind {
    /// All taxonomy kinds.
    pub const ALL: [Self; 3] = [Self::Category, Self::Technology, Self::UseCase];

    /// Entity kind of records in this taxonomy.
    #[must_use]
    pub const fn entity_kind(self) -> EntityKind {
        match self {
            Self::Category => EntityKind::Category,
            Self::Technology => EntityKind::Technology,
            Self::UseCase => EntityKind::UseCase,
        }
    }

    /// Singular endpoint stem (`create_<stem>`, `update_<stem>`, `delete_<stem>`).
    #[must_use]
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Technology => "technology",
            Self::UseCase => "usecase",
        }
    }

    /// Listing endpoint.
    #[must_use]
    pub const fn list_endpoint(self) -> &'static str {
        match self {
            Self::Category => "get_categories",
            Self::Technology => "get_technologies",
            Self::UseCase => "get_usecases",
        }
    }

    /// Key of the record array in the listing response.
    #[must_use]
    pub const fn list_key(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Technology => "technologies",
            Self::UseCase => "usecases",
        }
    }

    /// Form field carrying the record name.
    #[must_use]
    pub const fn name_field(self) -> &'static str {
        match self {
            Self::Category => "categoryName",
            Self::Technology => "technologyName",
            Self::UseCase => "usecaseName",
        }
    }

    /// Form field carrying the record id on update/delete.
    #[must_use]
    pub const fn id_field(self) -> &'static str {
        match self {
            Self::Category => "categoryid",
            Self::Technology => "technologyid",
            Self::UseCase => "usecaseid",
        }
    }

    /// Minimum accepted name length.
    #[must_use]
    pub const fn min_name_len(self) -> usize {
        match self {
            Self::Category | Self::Technology => 2,
            Self::UseCase => 3,
        }
    }
}

impl std::fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.entity_kind().label())
    }
}

impl std::str::FromStr for TaxonomyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" | "categories" => Ok(Self::Category),
            "technology" | "technologies" => Ok(Self::Technology),
            "usecase" | "use-case" | "usecases" | "use-cases" => Ok(Self::UseCase),
            _ => Err(format!("invalid taxonomy: {s}")),
        }
    }
}

/// One category, technology or use case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaxonomyEntry {
    /// Taxonomy the entry was loaded from; set by the client, not the wire.
    #[serde(skip, default = "default_kind")]
    pub taxonomy: TaxonomyKind,
    #[serde(alias = "categoryid", alias = "technologyid", alias = "usecaseid")]
    pub id: TaxonomyId,
    #[serde(
        alias = "categoryName",
        alias = "technologyName",
        alias = "usecaseName",
        alias = "categoryname",
        alias = "technologyname",
        alias = "usecasename",
        deserialize_with = "lenient_string"
    )]
    pub name: String,
    #[serde(
        rename = "createdDate",
        alias = "createddate",
        deserialize_with = "lenient_string"
    )]
    pub created_date: String,
}

const fn default_kind() -> TaxonomyKind {
    TaxonomyKind::Category
}

impl Default for TaxonomyKind {
    fn default() -> Self {
        default_kind()
    }
}

impl Entity for TaxonomyEntry {
    fn kind(&self) -> EntityKind {
        self.taxonomy.entity_kind()
    }

    fn entity_id(&self) -> &str {
        self.id.as_str()
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Searchable for TaxonomyEntry {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}
