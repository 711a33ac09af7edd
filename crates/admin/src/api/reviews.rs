//! Review endpoints.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use catalog_admin_core::types::de::lenient_string;
use catalog_admin_core::{ProductId, Review, ReviewId, UserId};

use super::ApiClient;
use super::types::{MessageResponse, messages};
use crate::error::ConsoleError;

/// One offset page of a review feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

impl ReviewPage {
    /// Whether the backend reported reviews for the subject.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.message == messages::FOUND
    }
}

#[derive(Debug, Deserialize)]
struct AllReviewsResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(default)]
    reviews: Vec<Review>,
}

impl ApiClient {
    /// Reviews of one product, starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure.
    #[instrument(skip(self))]
    pub async fn product_reviews_page(
        &self,
        productid: &ProductId,
        offset: u32,
        limit: u32,
    ) -> Result<ReviewPage, ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            productid: &'a ProductId,
            offset: u32,
            limit: u32,
        }
        let page: ReviewPage = self
            .post_json(
                "get_product_reviews_page",
                &Body {
                    productid,
                    offset,
                    limit,
                },
            )
            .await?;
        debug!(count = page.reviews.len(), message = %page.message, "Product reviews received");
        Ok(page)
    }

    /// Reviews written by one user, starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure.
    #[instrument(skip(self))]
    pub async fn user_reviews_page(
        &self,
        userid: &UserId,
        offset: u32,
        limit: u32,
    ) -> Result<ReviewPage, ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            userid: &'a UserId,
            offset: u32,
            limit: u32,
        }
        let page: ReviewPage = self
            .post_json(
                "get_user_reviews_page",
                &Body {
                    userid,
                    offset,
                    limit,
                },
            )
            .await?;
        debug!(count = page.reviews.len(), message = %page.message, "User reviews received");
        Ok(page)
    }

    /// Every review on the platform; an unexpected message yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure.
    #[instrument(skip(self))]
    pub async fn all_reviews(&self) -> Result<Vec<Review>, ConsoleError> {
        let response: AllReviewsResponse = self.get("get_all_reviews").await?;
        if response.message == messages::REVIEWS_RETRIEVED {
            Ok(response.reviews)
        } else {
            warn!(message = %response.message, "Reviews not retrieved");
            Ok(Vec::new())
        }
    }

    /// Delete one review.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a message other than "deleted".
    #[instrument(skip(self))]
    pub async fn delete_review(
        &self,
        userid: &UserId,
        reviewid: &ReviewId,
    ) -> Result<(), ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            userid: &'a UserId,
            reviewid: &'a ReviewId,
        }
        let response: MessageResponse = self
            .post_json("delete_review", &Body { userid, reviewid })
            .await?;
        response.require("delete review", messages::DELETED)?;
        info!(reviewid = %reviewid, "Review deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_found_flag() {
        let page: ReviewPage = serde_json::from_str(
            r#"{"message": "found", "reviews": [{"reviewid": 9, "username": "ann"}], "limit": 5, "has_more": true}"#,
        )
        .unwrap();
        assert!(page.is_found());
        assert_eq!(page.reviews[0].reviewid.as_str(), "9");
        assert_eq!(page.limit, Some(5));

        let page: ReviewPage = serde_json::from_str(r#"{"message": "not found"}"#).unwrap();
        assert!(!page.is_found());
        assert!(page.reviews.is_empty());
    }
}
