use std::sync::Arc;

use tracing::instrument;

use catalog_admin_core::{EntityKind, Product, Review, User, UserId};

use super::{DrawerSlot, ReviewDrawer};
use crate::confirm::Confirm;
use crate::error::ConsoleError;
use crate::list::feeds::{UserFeed, UserReviewFeed};
use crate::list::{ListController, LoadOutcome, LocalChange, MutationOutcome};
use crate::popup::PopupSelection;
use crate::state::Console;

/// Products owned by the user a drawer was opened for.
#[derive(Debug, Clone)]
pub struct UserProducts {
    pub user: User,
    pub products: Vec<Product>,
}

/// All platform users, with a products drawer and a reviews drawer.
///
/// At most one drawer is open; opening one closes the other.
#[derive(Debug)]
pub struct UsersScreen {
    console: Console,
    list: ListController<UserFeed>,
    products: DrawerSlot<UserProducts>,
    reviews: DrawerSlot<ReviewDrawer<UserReviewFeed>>,
}

impl UsersScreen {
    #[must_use]
    pub fn new(console: Console) -> Self {
        let list = ListController::new(UserFeed::new(console.api().clone()), console.list_options());
        Self {
            console,
            list,
            products: DrawerSlot::default(),
            reviews: DrawerSlot::default(),
        }
    }

    #[must_use]
    pub const fn list(&self) -> &ListController<UserFeed> {
        &self.list
    }

    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.list.visible()
    }

    /// Load every user.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; loaded users stay.
    pub async fn load(&self) -> Result<LoadOutcome, ConsoleError> {
        self.list.load_page(true).await
    }

    pub fn search(&self, query: &str) -> Vec<User> {
        self.list.search(query)
    }

    fn loaded(&self, userid: &UserId) -> Result<User, ConsoleError> {
        self.list
            .get(userid.as_str())
            .ok_or_else(|| ConsoleError::NotFound {
                kind: EntityKind::User,
                id: userid.to_string(),
            })
    }

    /// Enable or disable a user after confirmation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a user that is not loaded, or the call's error.
    #[instrument(skip(self, confirm))]
    pub async fn toggle_status(
        &self,
        userid: &UserId,
        confirm: &dyn Confirm,
    ) -> Result<MutationOutcome, ConsoleError> {
        let user = self.loaded(userid)?;
        let next = user.status.toggled();
        let prompt = format!("Are you sure you want to {} {}?", next.verb(), user.name);
        self.list
            .confirm_and_apply(
                userid.as_str(),
                confirm,
                &prompt,
                self.console.api().set_user_status(user.key(), next),
                LocalChange::Patch(Box::new(move |u: &mut User| u.status = next)),
            )
            .await
    }

    /// Remove a user after confirmation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a user that is not loaded, or the call's error.
    #[instrument(skip(self, confirm))]
    pub async fn remove(
        &self,
        userid: &UserId,
        confirm: &dyn Confirm,
    ) -> Result<MutationOutcome, ConsoleError> {
        let user = self.loaded(userid)?;
        let prompt = format!(
            "Are you sure you want to remove {}? This action cannot be undone.",
            user.name
        );
        self.list
            .confirm_and_apply(
                userid.as_str(),
                confirm,
                &prompt,
                self.console.api().remove_user(user.key()),
                LocalChange::Remove,
            )
            .await
    }

    /// Open the products drawer for a loaded user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a user that is not loaded, or the fetch error.
    pub async fn open_products(&self, userid: &UserId) -> Result<Arc<UserProducts>, ConsoleError> {
        let user = self.loaded(userid)?;
        self.reviews.close();
        let products = self
            .console
            .api()
            .user_products(user.key(), 1, self.console.config().page_limit)
            .await?;
        let drawer = Arc::new(UserProducts { user, products });
        self.products.replace(Arc::clone(&drawer));
        Ok(drawer)
    }

    /// Open the reviews drawer for a loaded user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a user that is not loaded, or the first page's
    /// fetch error.
    pub async fn open_reviews(
        &self,
        userid: &UserId,
    ) -> Result<Arc<ReviewDrawer<UserReviewFeed>>, ConsoleError> {
        let user = self.loaded(userid)?;
        self.products.close();
        let feed = UserReviewFeed::new(self.console.api().clone(), user.key().clone());
        let drawer =
            Arc::new(ReviewDrawer::open(user.name, feed, self.console.review_options()).await?);
        self.reviews.replace(Arc::clone(&drawer));
        Ok(drawer)
    }

    #[must_use]
    pub fn products_drawer(&self) -> Option<Arc<UserProducts>> {
        self.products.current()
    }

    #[must_use]
    pub fn reviews_drawer(&self) -> Option<Arc<ReviewDrawer<UserReviewFeed>>> {
        self.reviews.current()
    }

    pub fn close_drawers(&self) {
        self.products.close();
        self.reviews.close();
    }

    pub fn show_product(&self, product: Product) {
        self.console
            .popups()
            .open(PopupSelection::Product(product));
    }

    pub fn show_review(&self, review: Review) {
        self.console.popups().open(PopupSelection::Review(review));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use catalog_admin_core::UserStatus;

    use super::*;
    use crate::config::ConsoleConfig;
    use crate::confirm::AssumeYes;

    async fn loaded_screen(server: &MockServer) -> UsersScreen {
        server.mock(|when, then| {
            when.method(GET).path("/get_all_users");
            then.status(200).json_body(json!({
                "message": "Users retrieved successfully",
                "users": [
                    {"id": "u1", "name": "Ada", "email": "ada@x.com", "status": "active"},
                    {"id": "u2", "name": "Bob", "email": "bob@x.com", "status": "disabled"}
                ]
            }));
        });
        let config = ConsoleConfig {
            api_url: server.url("/").parse().unwrap(),
            ..ConsoleConfig::default()
        };
        let screen = UsersScreen::new(Console::with_store(config, None).unwrap());
        screen.load().await.unwrap();
        screen
    }

    #[tokio::test]
    async fn test_toggle_enables_disabled_user() {
        let server = MockServer::start_async().await;
        let screen = loaded_screen(&server).await;
        let toggle = server.mock(|when, then| {
            when.method(POST)
                .path("/toggle_user_status")
                .json_body(json!({"userid": "u2", "status": "active"}));
            then.status(200)
                .json_body(json!({"message": "User status updated successfully"}));
        });

        screen
            .toggle_status(&UserId::new("u2"), &AssumeYes)
            .await
            .unwrap();

        toggle.assert();
        assert_eq!(
            screen.list().get("u2").unwrap().status,
            UserStatus::Active
        );
    }

    #[tokio::test]
    async fn test_remove_drops_user() {
        let server = MockServer::start_async().await;
        let screen = loaded_screen(&server).await;
        server.mock(|when, then| {
            when.method(POST).path("/remove_user");
            then.status(200)
                .json_body(json!({"message": "User removed successfully"}));
        });

        screen.search("bob");
        screen.remove(&UserId::new("u2"), &AssumeYes).await.unwrap();

        assert!(screen.users().is_empty());
        assert_eq!(screen.list().snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_drawers_are_exclusive() {
        let server = MockServer::start_async().await;
        let screen = loaded_screen(&server).await;
        server.mock(|when, then| {
            when.method(POST).path("/get_all_product_details");
            then.status(200).json_body(json!({
                "message": "yes",
                "products": [{"productid": "p1", "productname": "Vision"}]
            }));
        });
        server.mock(|when, then| {
            when.method(POST).path("/get_user_reviews_page");
            then.status(200)
                .json_body(json!({"message": "not found", "reviews": []}));
        });

        let drawer = screen.open_products(&UserId::new("u1")).await.unwrap();
        assert_eq!(drawer.products.len(), 1);

        let reviews = screen.open_reviews(&UserId::new("u1")).await.unwrap();
        assert!(reviews.reviews().is_empty());
        assert!(!reviews.has_more());
        assert!(screen.products_drawer().is_none());
        assert!(screen.reviews_drawer().is_some());
    }
}
