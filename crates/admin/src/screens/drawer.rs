use tracing::instrument;

use catalog_admin_core::Review;

use crate::error::ConsoleError;
use crate::list::{Feed, ListController, ListOptions, LoadOutcome};

/// Side panel listing the reviews of one product or one user, paged by offset.
#[derive(Debug)]
pub struct ReviewDrawer<F: Feed<Item = Review>> {
    title: String,
    list: ListController<F>,
}

impl<F: Feed<Item = Review>> ReviewDrawer<F> {
    /// Open the drawer and load its first page.
    ///
    /// # Errors
    ///
    /// Returns the first page's fetch error.
    #[instrument(skip(feed, options))]
    pub async fn open(title: String, feed: F, options: ListOptions) -> Result<Self, ConsoleError> {
        let drawer = Self {
            title,
            list: ListController::new(feed, options),
        };
        drawer.list.load_page(true).await?;
        Ok(drawer)
    }

    /// Name of the product or user the drawer belongs to.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn reviews(&self) -> Vec<Review> {
        self.list.visible()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.list.has_more()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
    }

    /// Load the next page of reviews.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; reviews already shown stay.
    pub async fn load_more(&self) -> Result<LoadOutcome, ConsoleError> {
        self.list.load_more().await
    }

    #[must_use]
    pub const fn feed(&self) -> &F {
        self.list.feed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;
    use url::Url;

    use catalog_admin_core::ProductId;

    use super::*;
    use crate::api::ApiClient;
    use crate::list::feeds::ProductReviewFeed;

    #[tokio::test]
    async fn test_not_found_on_load_more_ends_paging_and_keeps_reviews() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/get_product_reviews_page")
                .json_body(json!({"productid": "p1", "offset": 0, "limit": 5}));
            then.status(200).json_body(json!({
                "message": "found",
                "reviews": [{"reviewid": "r1"}],
                "has_more": true
            }));
        });
        let missing = server.mock(|when, then| {
            when.method(POST)
                .path("/get_product_reviews_page")
                .json_body(json!({"productid": "p1", "offset": 1, "limit": 5}));
            then.status(200).json_body(json!({"message": "no reviews"}));
        });
        let api = ApiClient::with_base_url(Url::parse(&server.url("/")).unwrap()).unwrap();
        let options = ListOptions {
            page_size: 5,
            ..ListOptions::default()
        };

        let drawer = ReviewDrawer::open(
            "Vision".to_string(),
            ProductReviewFeed::new(api, ProductId::new("p1")),
            options,
        )
        .await
        .unwrap();
        assert!(drawer.has_more());

        drawer.load_more().await.unwrap();

        missing.assert();
        assert_eq!(drawer.reviews().len(), 1);
        assert!(!drawer.has_more());
        assert_eq!(drawer.load_more().await.unwrap(), LoadOutcome::Exhausted);
    }
}
