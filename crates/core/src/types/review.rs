//! Review records.

use serde::{Deserialize, Serialize};

use super::de::{lenient_f64, lenient_string};
use super::entity::{Entity, EntityKind, Searchable};
use super::id::{ProductId, ReviewId, UserId};

/// A user's review of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Review {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub reviewid: ReviewId,
    pub userid: UserId,
    pub productid: ProductId,
    #[serde(deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(deserialize_with = "lenient_string")]
    pub commercialorpersonal: String,
    #[serde(deserialize_with = "lenient_string")]
    pub howlong: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub experiencerate: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub efficiencyrate: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub documentationrate: f64,
    #[serde(deserialize_with = "lenient_string")]
    pub paidornot: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub paidrate: f64,
    #[serde(deserialize_with = "lenient_string")]
    pub colorcode: String,
    #[serde(deserialize_with = "lenient_string")]
    pub comment: String,
    #[serde(deserialize_with = "lenient_string")]
    pub createddate: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub code: String,
}

impl Review {
    /// Reviewer name, falling back when the backend omitted it.
    #[must_use]
    pub fn author(&self) -> &str {
        if self.username.is_empty() {
            "Unknown User"
        } else {
            &self.username
        }
    }
}

impl Entity for Review {
    fn kind(&self) -> EntityKind {
        EntityKind::Review
    }

    fn entity_id(&self) -> &str {
        self.reviewid.as_str()
    }

    fn display_name(&self) -> &str {
        self.author()
    }
}

impl Searchable for Review {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.reviewid.as_str(),
            self.userid.as_str(),
            self.productid.as_str(),
            &self.username,
            &self.commercialorpersonal,
            &self.howlong,
            &self.comment,
            &self.email,
        ]
    }
}

/// Star glyph names for a fractional rating: full, half, then outline stars.
#[must_use]
pub fn rating_stars(rating: f64) -> Vec<&'static str> {
    let rating = rating.clamp(0.0, 5.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let full = rating.floor() as usize;
    let mut stars = vec!["star"; full];
    if rating.fract() >= 0.5 {
        stars.push("star_half");
    }
    stars.resize(5, "star_outline");
    stars
}
