use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::instrument;

use catalog_admin_core::{EntityKind, Product, ProductId, Review, ReviewId, User, UserId};

use crate::confirm::Confirm;
use crate::error::ConsoleError;
use crate::list::feeds::AllReviewsFeed;
use crate::list::{ListController, LoadOutcome, LocalChange, MutationOutcome};
use crate::popup::PopupSelection;
use crate::state::Console;

/// Mean experience rating with one decimal, `"0.0"` for no reviews.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "0.0".to_string();
    }
    let sum: f64 = reviews.iter().map(|r| r.experiencerate).sum();
    #[allow(clippy::cast_precision_loss)]
    let average = sum / reviews.len() as f64;
    format!("{average:.1}")
}

/// Every review on the platform.
///
/// The whole set is fetched at once; the screen reveals it in steps of
/// `reviews_per_page`. A new search starts again at the first step.
#[derive(Debug)]
pub struct ReviewsScreen {
    console: Console,
    list: ListController<AllReviewsFeed>,
    shown: AtomicUsize,
    selected_user: RwLock<Option<User>>,
}

impl ReviewsScreen {
    #[must_use]
    pub fn new(console: Console) -> Self {
        let list = ListController::new(
            AllReviewsFeed::new(console.api().clone()),
            console.list_options(),
        );
        let step = console.config().reviews_per_page;
        Self {
            console,
            list,
            shown: AtomicUsize::new(step),
            selected_user: RwLock::new(None),
        }
    }

    fn step(&self) -> usize {
        self.console.config().reviews_per_page
    }

    #[must_use]
    pub const fn list(&self) -> &ListController<AllReviewsFeed> {
        &self.list
    }

    /// Fetch every review and show the first step.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; loaded reviews stay.
    pub async fn load(&self) -> Result<LoadOutcome, ConsoleError> {
        let outcome = self.list.load_page(true).await?;
        self.shown.store(self.step(), Ordering::Relaxed);
        Ok(outcome)
    }

    /// Reviews currently revealed.
    #[must_use]
    pub fn displayed(&self) -> Vec<Review> {
        let mut visible = self.list.visible();
        visible.truncate(self.shown.load(Ordering::Relaxed));
        visible
    }

    /// Reveal the next step.
    pub fn show_more(&self) -> Vec<Review> {
        self.shown.fetch_add(self.step(), Ordering::Relaxed);
        self.displayed()
    }

    /// Whether matching reviews remain hidden.
    #[must_use]
    pub fn has_more_to_show(&self) -> bool {
        self.shown.load(Ordering::Relaxed) < self.list.visible().len()
    }

    /// Filter reviews and return to the first step.
    pub fn search(&self, query: &str) -> Vec<Review> {
        self.list.search(query);
        self.shown.store(self.step(), Ordering::Relaxed);
        self.displayed()
    }

    /// Mean experience rating over every loaded review.
    #[must_use]
    pub fn average_rating(&self) -> String {
        average_rating(self.list.snapshot().items())
    }

    /// Delete a review after confirmation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a review that is not loaded, or the call's error.
    #[instrument(skip(self, confirm))]
    pub async fn delete(
        &self,
        reviewid: &ReviewId,
        confirm: &dyn Confirm,
    ) -> Result<MutationOutcome, ConsoleError> {
        let review = self
            .list
            .get(reviewid.as_str())
            .ok_or_else(|| ConsoleError::NotFound {
                kind: EntityKind::Review,
                id: reviewid.to_string(),
            })?;
        self.list
            .confirm_and_apply(
                reviewid.as_str(),
                confirm,
                "Are you sure you want to delete review ?",
                self.console.api().delete_review(&review.userid, reviewid),
                LocalChange::Remove,
            )
            .await
    }

    pub fn show_review(&self, review: Review) {
        self.console.popups().open(PopupSelection::Review(review));
    }

    /// Fetch a product's full details and show them in the product popup.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the backend does not know the product, or the
    /// fetch error.
    pub async fn show_product(&self, productid: &ProductId) -> Result<Product, ConsoleError> {
        let details = self
            .console
            .api()
            .product_details(productid)
            .await?
            .ok_or_else(|| ConsoleError::NotFound {
                kind: EntityKind::Product,
                id: productid.to_string(),
            })?;
        let product = details.into_product();
        self.console
            .popups()
            .open(PopupSelection::Product(product.clone()));
        Ok(product)
    }

    /// Fetch a reviewer's profile into the user panel.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the backend does not know the user, or the
    /// fetch error.
    pub async fn show_user(&self, userid: &UserId) -> Result<User, ConsoleError> {
        let user = self
            .console
            .api()
            .user_details(userid)
            .await?
            .ok_or_else(|| ConsoleError::NotFound {
                kind: EntityKind::User,
                id: userid.to_string(),
            })?;
        *self
            .selected_user
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
        Ok(user)
    }

    #[must_use]
    pub fn selected_user(&self) -> Option<User> {
        self.selected_user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn close_user(&self) {
        self.selected_user
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
