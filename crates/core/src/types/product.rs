//! Product records as returned by the admin product feeds.

use serde::{Deserialize, Serialize};

use super::de::{lenient_f64, lenient_i64, lenient_string, lenient_string_list};
use super::entity::{Entity, EntityKind, Searchable};
use super::id::{ProductId, UserId};
use super::status::ProductStatus;

/// A catalog product.
///
/// Scalar fields the backend may omit or null out default to empty values;
/// the related-name arrays are filled by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Product {
    pub productid: ProductId,
    /// Owner of the product.
    pub userid: UserId,
    #[serde(deserialize_with = "lenient_string")]
    pub productname: String,
    /// Base64 encoded image bytes.
    #[serde(deserialize_with = "lenient_string")]
    pub productimage: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productcategory: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productlicense: String,
    #[serde(deserialize_with = "lenient_string")]
    pub producttechnology: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productwebsite: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productfundingstage: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productusecaseid: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productfacebook: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productdocumentation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productlinkedin: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productfounderid: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productdescription: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productbaseaimodelid: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productdeploymentid: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productrepositoryid: String,
    #[serde(deserialize_with = "lenient_string")]
    pub productmediaid: String,
    #[serde(deserialize_with = "lenient_string")]
    pub xlink: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(rename = "isFeatured", deserialize_with = "lenient_i64")]
    pub is_featured: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub counts: String,
    pub status: ProductStatus,
    #[serde(deserialize_with = "lenient_string")]
    pub createddate: String,
    #[serde(deserialize_with = "lenient_string_list")]
    pub usecasenames: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub technologynames: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub foundernames: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub baseaimodelnames: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub deploymentnames: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub repositorylinks: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub medialinks: Vec<String>,
}

impl Product {
    /// Whether the product carries an inline image.
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.productimage.is_empty()
    }

    /// Star glyph names for the product rating, five entries long.
    #[must_use]
    pub fn stars(&self) -> [&'static str; 5] {
        let mut stars = ["star_border"; 5];
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let filled = self.rating.clamp(0.0, 5.0) as usize;
        for star in stars.iter_mut().take(filled) {
            *star = "star";
        }
        stars
    }
}

impl Entity for Product {
    fn kind(&self) -> EntityKind {
        EntityKind::Product
    }

    fn entity_id(&self) -> &str {
        self.productid.as_str()
    }

    fn display_name(&self) -> &str {
        &self.productname
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.productname.as_str(),
            self.productcategory.as_str(),
            self.productlicense.as_str(),
            self.producttechnology.as_str(),
            self.productfundingstage.as_str(),
        ];
        fields.extend(self.technologynames.iter().map(String::as_str));
        fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::entity::matches_query;

    #[test]
    fn test_deserialize_sparse_payload() {
        let json = r#"{
            "productid": 12,
            "userid": "u1",
            "productname": "Vectorly",
            "productimage": null,
            "rating": "4",
            "status": "0",
            "technologynames": ["Rust", "Postgres"]
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.productid.as_str(), "12");
        assert_eq!(p.productimage, "");
        assert!((p.rating - 4.0).abs() < f64::EPSILON);
        assert_eq!(p.status, ProductStatus::Inactive);
        assert_eq!(p.technologynames.len(), 2);
        assert!(p.usecasenames.is_empty());
    }

    #[test]
    fn test_search_fields_cover_technology_names() {
        let p = Product {
            productname: "Vectorly".into(),
            technologynames: vec!["Rust".into()],
            ..Product::default()
        };
        assert!(matches_query(&p, "rust"));
        assert!(matches_query(&p, "VECTOR"));
        assert!(!matches_query(&p, "python"));
    }

    #[test]
    fn test_stars() {
        let p = Product {
            rating: 3.0,
            ..Product::default()
        };
        assert_eq!(
            p.stars(),
            ["star", "star", "star", "star_border", "star_border"]
        );
    }
}
