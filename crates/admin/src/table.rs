//! Table descriptors for entity lists.
//!
//! Each entity type names the columns a list screen shows and how to read
//! them, so one renderer serves every list.

use catalog_admin_core::types::review::rating_stars;
use catalog_admin_core::{Product, Review, TaxonomyEntry, User};

/// Column definition for an entity table.
pub struct TableColumn<T> {
    /// Unique key for the column.
    pub key: &'static str,
    /// Display label for the column header.
    pub label: &'static str,
    /// Whether the column is shown by default.
    pub default_visible: bool,
    value: fn(&T) -> String,
}

impl<T> std::fmt::Debug for TableColumn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableColumn")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("default_visible", &self.default_visible)
            .finish_non_exhaustive()
    }
}

impl<T> TableColumn<T> {
    /// Create a new visible column.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str, value: fn(&T) -> String) -> Self {
        Self {
            key,
            label,
            default_visible: true,
            value,
        }
    }

    /// Set whether the column is visible by default.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }

    /// Cell text for `record`.
    #[must_use]
    pub fn cell(&self, record: &T) -> String {
        (self.value)(record)
    }
}

/// An entity that can be listed as a table.
pub trait Tabular: Sized {
    fn columns() -> Vec<TableColumn<Self>>;
}

/// Header and rows of the default-visible columns.
#[must_use]
pub fn render<T: Tabular>(records: &[T]) -> (Vec<&'static str>, Vec<Vec<String>>) {
    let columns: Vec<TableColumn<T>> = T::columns()
        .into_iter()
        .filter(|c| c.default_visible)
        .collect();
    let header = columns.iter().map(|c| c.label).collect();
    let rows = records
        .iter()
        .map(|record| columns.iter().map(|c| c.cell(record)).collect())
        .collect();
    (header, rows)
}

fn joined(values: &[String]) -> String {
    values.join(", ")
}

fn stars(rating: f64) -> String {
    rating_stars(rating)
        .into_iter()
        .map(|s| match s {
            "star" => '★',
            "star_half" => '⯪',
            _ => '☆',
        })
        .collect()
}

impl Tabular for Product {
    fn columns() -> Vec<TableColumn<Self>> {
        vec![
            TableColumn::new("productid", "ID", |p: &Self| p.productid.to_string()),
            TableColumn::new("productname", "Name", |p: &Self| p.productname.clone()),
            TableColumn::new("productcategory", "Category", |p: &Self| p.productcategory.clone()),
            TableColumn::new("producttechnology", "Technology", |p: &Self| {
                p.producttechnology.clone()
            }),
            TableColumn::new("productlicense", "License", |p: &Self| p.productlicense.clone())
                .visible(false),
            TableColumn::new("productfundingstage", "Funding", |p: &Self| {
                p.productfundingstage.clone()
            })
            .visible(false),
            TableColumn::new("usecasenames", "Use cases", |p: &Self| joined(&p.usecasenames))
                .visible(false),
            TableColumn::new("rating", "Rating", |p: &Self| stars(p.rating)),
            TableColumn::new("status", "Status", |p: &Self| p.status.to_string()),
            TableColumn::new("userid", "Owner", |p: &Self| p.userid.to_string()),
        ]
    }
}

impl Tabular for User {
    fn columns() -> Vec<TableColumn<Self>> {
        vec![
            TableColumn::new("id", "ID", |u: &Self| u.key().to_string()),
            TableColumn::new("name", "Name", |u: &Self| u.name.clone()),
            TableColumn::new("email", "Email", |u: &Self| u.email.clone()),
            TableColumn::new("designation", "Designation", |u: &Self| u.designation.clone()),
            TableColumn::new("status", "Status", |u: &Self| u.status.to_string()),
            TableColumn::new("createdDate", "Joined", |u: &Self| u.created_date.clone()).visible(false),
        ]
    }
}

impl Tabular for Review {
    fn columns() -> Vec<TableColumn<Self>> {
        vec![
            TableColumn::new("reviewid", "ID", |r: &Self| r.reviewid.to_string()),
            TableColumn::new("productid", "Product", |r: &Self| r.productid.to_string()),
            TableColumn::new("username", "Reviewer", |r: &Self| r.author().to_string()),
            TableColumn::new("experiencerate", "Experience", |r: &Self| stars(r.experiencerate)),
            TableColumn::new("comment", "Comment", |r: &Self| r.comment.clone()),
            TableColumn::new("email", "Email", |r: &Self| r.email.clone()).visible(false),
            TableColumn::new("createddate", "Date", |r: &Self| r.createddate.clone()),
        ]
    }
}

impl Tabular for TaxonomyEntry {
    fn columns() -> Vec<TableColumn<Self>> {
        vec![
            TableColumn::new("id", "ID", |t: &Self| t.id.to_string()),
            TableColumn::new("name", "Name", |t: &Self| t.name.clone()),
            TableColumn::new("createdDate", "Created", |t: &Self| t.created_date.clone()),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use catalog_admin_core::{ProductId, ProductStatus};

    use super::*;

    #[test]
    fn test_render_skips_hidden_columns() {
        let product = Product {
            productid: ProductId::new("p1"),
            productname: "Vision".to_string(),
            rating: 3.5,
            status: ProductStatus::Inactive,
            ..Product::default()
        };
        let (header, rows) = render(&[product]);

        assert!(!header.contains(&"License"));
        assert_eq!(header.len(), rows[0].len());
        let rating = header.iter().position(|h| *h == "Rating").unwrap_or(0);
        assert_eq!(rows[0][rating], "★★★⯪☆");
    }

    #[test]
    fn test_every_entity_has_an_id_column() {
        assert_eq!(Product::columns()[0].key, "productid");
        assert_eq!(User::columns()[0].key, "id");
        assert_eq!(Review::columns()[0].key, "reviewid");
        assert_eq!(TaxonomyEntry::columns()[0].key, "id");
    }
}
