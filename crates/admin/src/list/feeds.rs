//! Backend feeds behind the list screens.

use async_trait::async_trait;
use tracing::debug;

use catalog_admin_core::{
    Entity, EntityKind, Product, ProductId, Review, Searchable, TaxonomyEntry, TaxonomyKind, User,
    UserId,
};

use super::{PageRequest, PageResponse};
use crate::api::{ApiClient, ReviewPage};
use crate::error::ConsoleError;

/// Source of pages for a [`ListController`](super::ListController).
#[async_trait]
pub trait Feed: Send + Sync {
    type Item: Entity + Searchable;

    /// Kind of entity the feed yields.
    fn kind(&self) -> EntityKind;

    /// Fetch one page.
    ///
    /// # Errors
    ///
    /// Returns error when the backend cannot be reached or answers badly.
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse<Self::Item>, ConsoleError>;
}

/// Admin product feed, paged by page number.
#[derive(Debug, Clone)]
pub struct ProductFeed {
    api: ApiClient,
}

impl ProductFeed {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Feed for ProductFeed {
    type Item = Product;

    fn kind(&self) -> EntityKind {
        EntityKind::Product
    }

    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse<Product>, ConsoleError> {
        let page = self.api.product_page(request.page, request.limit).await?;
        Ok(PageResponse {
            items: page.products,
            total: page.total,
            has_more: page.has_more,
        })
    }
}

fn review_page(page: ReviewPage) -> PageResponse<Review> {
    if page.is_found() {
        PageResponse {
            items: page.reviews,
            total: None,
            has_more: Some(page.has_more.unwrap_or(false)),
        }
    } else {
        debug!(message = %page.message, "No reviews for subject");
        PageResponse::empty()
    }
}

/// Reviews of one product, paged by offset.
#[derive(Debug, Clone)]
pub struct ProductReviewFeed {
    api: ApiClient,
    productid: ProductId,
}

impl ProductReviewFeed {
    #[must_use]
    pub const fn new(api: ApiClient, productid: ProductId) -> Self {
        Self { api, productid }
    }

    #[must_use]
    pub const fn productid(&self) -> &ProductId {
        &self.productid
    }
}

#[async_trait]
impl Feed for ProductReviewFeed {
    type Item = Review;

    fn kind(&self) -> EntityKind {
        EntityKind::Review
    }

    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse<Review>, ConsoleError> {
        let page = self
            .api
            .product_reviews_page(&self.productid, request.offset, request.limit)
            .await?;
        Ok(review_page(page))
    }
}

/// Reviews written by one user, paged by offset.
#[derive(Debug, Clone)]
pub struct UserReviewFeed {
    api: ApiClient,
    userid: UserId,
}

impl UserReviewFeed {
    #[must_use]
    pub const fn new(api: ApiClient, userid: UserId) -> Self {
        Self { api, userid }
    }

    #[must_use]
    pub const fn userid(&self) -> &UserId {
        &self.userid
    }
}

#[async_trait]
impl Feed for UserReviewFeed {
    type Item = Review;

    fn kind(&self) -> EntityKind {
        EntityKind::Review
    }

    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse<Review>, ConsoleError> {
        let page = self
            .api
            .user_reviews_page(&self.userid, request.offset, request.limit)
            .await?;
        Ok(review_page(page))
    }
}

/// Every user, delivered at once.
#[derive(Debug, Clone)]
pub struct UserFeed {
    api: ApiClient,
}

impl UserFeed {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Feed for UserFeed {
    type Item = User;

    fn kind(&self) -> EntityKind {
        EntityKind::User
    }

    async fn fetch(&self, _request: &PageRequest) -> Result<PageResponse<User>, ConsoleError> {
        Ok(PageResponse::complete(self.api.all_users().await?))
    }
}

/// Every review, delivered at once.
#[derive(Debug, Clone)]
pub struct AllReviewsFeed {
    api: ApiClient,
}

impl AllReviewsFeed {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Feed for AllReviewsFeed {
    type Item = Review;

    fn kind(&self) -> EntityKind {
        EntityKind::Review
    }

    async fn fetch(&self, _request: &PageRequest) -> Result<PageResponse<Review>, ConsoleError> {
        Ok(PageResponse::complete(self.api.all_reviews().await?))
    }
}

/// Every entry of one taxonomy, delivered at once.
#[derive(Debug, Clone)]
pub struct TaxonomyFeed {
    api: ApiClient,
    kind: TaxonomyKind,
}

impl TaxonomyFeed {
    #[must_use]
    pub const fn new(api: ApiClient, kind: TaxonomyKind) -> Self {
        Self { api, kind }
    }

    #[must_use]
    pub const fn taxonomy(&self) -> TaxonomyKind {
        self.kind
    }
}

#[async_trait]
impl Feed for TaxonomyFeed {
    type Item = TaxonomyEntry;

    fn kind(&self) -> EntityKind {
        self.kind.entity_kind()
    }

    async fn fetch(
        &self,
        _request: &PageRequest,
    ) -> Result<PageResponse<TaxonomyEntry>, ConsoleError> {
        Ok(PageResponse::complete(self.api.taxonomy_list(self.kind).await?))
    }
}
