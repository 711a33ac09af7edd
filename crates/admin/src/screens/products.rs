use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, instrument, warn};

use catalog_admin_core::{EntityKind, Product, ProductId, Review, User, UserId};

use super::{DrawerSlot, ReviewDrawer};
use crate::api::AssignOutcome;
use crate::confirm::Confirm;
use crate::error::ConsoleError;
use crate::list::feeds::{ProductFeed, ProductReviewFeed};
use crate::list::{ListController, LoadOutcome, LocalChange, MutationOutcome};
use crate::popup::{PopupKind, PopupSelection};
use crate::routing::update_product_path;
use crate::state::Console;

/// Users offered by the assign-owner dialog of one product.
#[derive(Debug, Clone)]
pub struct AssignDialog {
    product: Product,
    users: Vec<User>,
}

impl AssignDialog {
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Users whose email or name contains `query`; a blank query suggests nobody.
    #[must_use]
    pub fn suggest(&self, query: &str) -> Vec<&User> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.users
            .iter()
            .filter(|user| {
                user.email.to_lowercase().contains(&needle)
                    || user.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn find(&self, userid: &UserId) -> Option<&User> {
        self.users.iter().find(|user| user.key() == userid)
    }
}

/// All products, with per-product review counts, a review drawer and the
/// assign-owner dialog.
#[derive(Debug)]
pub struct ProductsScreen {
    console: Console,
    list: ListController<ProductFeed>,
    review_counts: RwLock<HashMap<ProductId, u64>>,
    drawer: DrawerSlot<ReviewDrawer<ProductReviewFeed>>,
}

impl ProductsScreen {
    #[must_use]
    pub fn new(console: Console) -> Self {
        let list = ListController::new(
            ProductFeed::new(console.api().clone()),
            console.list_options(),
        );
        Self {
            console,
            list,
            review_counts: RwLock::new(HashMap::new()),
            drawer: DrawerSlot::default(),
        }
    }

    #[must_use]
    pub const fn list(&self) -> &ListController<ProductFeed> {
        &self.list
    }

    /// Products matching the current search.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.list.visible()
    }

    /// Load the first page again and refresh review counts.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; loaded products stay.
    pub async fn load(&self) -> Result<LoadOutcome, ConsoleError> {
        let outcome = self.list.load_page(true).await?;
        self.refresh_review_counts().await;
        Ok(outcome)
    }

    /// Load the next page when there is one.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; loaded products stay.
    pub async fn load_more(&self) -> Result<LoadOutcome, ConsoleError> {
        let outcome = self.list.load_more().await?;
        if matches!(outcome, LoadOutcome::Loaded { .. }) {
            self.refresh_review_counts().await;
        }
        Ok(outcome)
    }

    pub fn search(&self, query: &str) -> Vec<Product> {
        self.list.search(query)
    }

    /// Review count shown next to a product; zero until counts arrive.
    #[must_use]
    pub fn review_count(&self, productid: &ProductId) -> u64 {
        self.review_counts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(productid)
            .copied()
            .unwrap_or(0)
    }

    /// Counts are decoration: a failure is logged and the old counts stay.
    async fn refresh_review_counts(&self) {
        let ids: Vec<ProductId> = self
            .list
            .snapshot()
            .items()
            .iter()
            .map(|p| p.productid.clone())
            .collect();
        if ids.is_empty() {
            return;
        }
        match self.console.api().review_counts(&ids).await {
            Ok(counts) => {
                debug!(products = counts.len(), "Review counts refreshed");
                self.review_counts
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend(counts);
            }
            Err(e) => warn!(error = %e, "Failed to load review counts"),
        }
    }

    fn loaded(&self, productid: &ProductId) -> Result<Product, ConsoleError> {
        self.list
            .get(productid.as_str())
            .ok_or_else(|| ConsoleError::NotFound {
                kind: EntityKind::Product,
                id: productid.to_string(),
            })
    }

    /// Delete a product after confirmation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a product that is not loaded, or the call's error.
    #[instrument(skip(self, confirm))]
    pub async fn delete(
        &self,
        productid: &ProductId,
        confirm: &dyn Confirm,
    ) -> Result<MutationOutcome, ConsoleError> {
        let product = self.loaded(productid)?;
        let prompt = format!("Are you sure you want to delete {}?", product.productname);
        let outcome = self
            .list
            .confirm_and_apply(
                productid.as_str(),
                confirm,
                &prompt,
                self.console.api().delete_product(productid),
                LocalChange::Remove,
            )
            .await?;
        if outcome == MutationOutcome::Applied {
            self.review_counts
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(productid);
        }
        Ok(outcome)
    }

    /// Flip a product between active and inactive after confirmation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a product that is not loaded, or the call's error.
    #[instrument(skip(self, confirm))]
    pub async fn toggle_status(
        &self,
        productid: &ProductId,
        confirm: &dyn Confirm,
    ) -> Result<MutationOutcome, ConsoleError> {
        let product = self.loaded(productid)?;
        let next = product.status.toggled();
        let prompt = format!(
            "Are you sure you want to {} \"{}\"?",
            next.verb(),
            product.productname
        );
        self.list
            .confirm_and_apply(
                productid.as_str(),
                confirm,
                &prompt,
                self.console
                    .api()
                    .set_product_status(productid, &product.userid, next),
                LocalChange::Patch(Box::new(move |p: &mut Product| p.status = next)),
            )
            .await
    }

    /// Load the users a product can be assigned to.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a product that is not loaded, or the fetch error.
    pub async fn open_assign(&self, productid: &ProductId) -> Result<AssignDialog, ConsoleError> {
        let product = self.loaded(productid)?;
        let users = self.console.api().all_users().await?;
        Ok(AssignDialog { product, users })
    }

    /// Assign the dialog's product to `userid` after confirmation.
    ///
    /// Disabled users are refused before anything is sent. Returns `None`
    /// when the operator declines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a user not offered by the dialog, `NotAllowed`
    /// for a disabled user, or the call's error.
    #[instrument(skip(self, dialog, confirm), fields(productid = %dialog.product.productid))]
    pub async fn assign(
        &self,
        dialog: &AssignDialog,
        userid: &UserId,
        confirm: &dyn Confirm,
    ) -> Result<Option<AssignOutcome>, ConsoleError> {
        let user = dialog.find(userid).ok_or_else(|| ConsoleError::NotFound {
            kind: EntityKind::User,
            id: userid.to_string(),
        })?;
        if !user.can_own_products() {
            return Err(ConsoleError::NotAllowed(
                "Cannot assign product to a disabled user".to_string(),
            ));
        }
        let prompt = format!(
            "Are you sure you want to assign \"{}\" to {} ({})?",
            dialog.product.productname, user.name, user.email
        );
        if !confirm.confirm(&prompt) {
            return Ok(None);
        }

        let owner = user.key().clone();
        let outcome = self
            .console
            .api()
            .assign_product(&dialog.product.productid, &owner)
            .await?;
        if outcome == AssignOutcome::Assigned {
            self.list
                .patch(dialog.product.productid.as_str(), |p| p.userid = owner);
            info!(userid = %userid, "Product owner changed");
        }
        Ok(Some(outcome))
    }

    /// Open the review drawer for a loaded product, replacing any open one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a product that is not loaded, or the first
    /// page's fetch error.
    pub async fn open_reviews(
        &self,
        productid: &ProductId,
    ) -> Result<Arc<ReviewDrawer<ProductReviewFeed>>, ConsoleError> {
        let product = self.loaded(productid)?;
        let feed = ProductReviewFeed::new(self.console.api().clone(), productid.clone());
        let drawer = Arc::new(
            ReviewDrawer::open(product.productname, feed, self.console.review_options()).await?,
        );
        self.drawer.replace(Arc::clone(&drawer));
        Ok(drawer)
    }

    #[must_use]
    pub fn reviews_drawer(&self) -> Option<Arc<ReviewDrawer<ProductReviewFeed>>> {
        self.drawer.current()
    }

    pub fn close_reviews(&self) {
        self.drawer.close();
    }

    /// Show a loaded product in the shared product popup.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a product that is not loaded.
    pub fn show_product(&self, productid: &ProductId) -> Result<(), ConsoleError> {
        let product = self.loaded(productid)?;
        self.console
            .popups()
            .open(PopupSelection::Product(product));
        Ok(())
    }

    pub fn show_review(&self, review: Review) {
        self.console.popups().open(PopupSelection::Review(review));
    }

    pub fn close_popup(&self, kind: PopupKind) {
        self.console.popups().close(kind);
    }

    /// Route of the edit screen for a loaded product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a product that is not loaded.
    pub fn edit_path(&self, productid: &ProductId) -> Result<String, ConsoleError> {
        let product = self.loaded(productid)?;
        Ok(update_product_path(
            product.productid.as_str(),
            product.userid.as_str(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use catalog_admin_core::ProductStatus;

    use super::*;
    use crate::config::ConsoleConfig;
    use crate::confirm::{AssumeNo, AssumeYes};

    fn console(server: &MockServer) -> Console {
        let config = ConsoleConfig {
            api_url: server.url("/").parse().unwrap(),
            page_limit: 2,
            ..ConsoleConfig::default()
        };
        Console::with_store(config, None).unwrap()
    }

    fn product(id: &str, name: &str, status: i64) -> serde_json::Value {
        json!({"productid": id, "productname": name, "userid": "u1", "status": status})
    }

    async fn loaded_screen(server: &MockServer) -> ProductsScreen {
        server.mock(|when, then| {
            when.method(POST).path("/get_all_product_details_all_admin");
            then.status(200).json_body(json!({
                "message": "found",
                "products": [product("p1", "Vision", 1), product("p2", "Speech", 0)],
                "total": 3,
                "has_more": true
            }));
        });
        server.mock(|when, then| {
            when.method(POST).path("/product_comparison_review_count");
            then.status(200).json_body(json!({
                "message": "success",
                "review_counts": [{"productid": "p1", "count": 4}]
            }));
        });
        let screen = ProductsScreen::new(console(server));
        screen.load().await.unwrap();
        screen
    }

    #[tokio::test]
    async fn test_load_fetches_counts() {
        let server = MockServer::start_async().await;
        let screen = loaded_screen(&server).await;

        assert_eq!(screen.products().len(), 2);
        assert_eq!(screen.review_count(&ProductId::new("p1")), 4);
        assert_eq!(screen.review_count(&ProductId::new("p2")), 0);
    }

    #[tokio::test]
    async fn test_toggle_patches_in_place() {
        let server = MockServer::start_async().await;
        let screen = loaded_screen(&server).await;
        let toggle = server.mock(|when, then| {
            when.method(POST)
                .path("/toggle_product_status")
                .json_body(json!({"productid": "p1", "userid": "u1", "status": 0}));
            then.status(200)
                .json_body(json!({"message": "Product status updated successfully"}));
        });

        let outcome = screen
            .toggle_status(&ProductId::new("p1"), &AssumeYes)
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::Applied);
        toggle.assert();
        let p1 = screen.list().get("p1").unwrap();
        assert_eq!(p1.status, ProductStatus::Inactive);
        assert_eq!(screen.products().len(), 2);
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let server = MockServer::start_async().await;
        let screen = loaded_screen(&server).await;
        let delete = server.mock(|when, then| {
            when.method(POST).path("/delete_product");
            then.status(200).json_body(json!({"message": "deleted"}));
        });

        let outcome = screen
            .delete(&ProductId::new("p2"), &AssumeNo)
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::Cancelled);
        delete.assert_hits(0);
        assert_eq!(screen.products().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_product() {
        let server = MockServer::start_async().await;
        let screen = loaded_screen(&server).await;
        server.mock(|when, then| {
            when.method(POST).path("/delete_product");
            then.status(200).json_body(json!({"message": "not deleted"}));
        });

        let result = screen.delete(&ProductId::new("p1"), &AssumeYes).await;

        assert!(matches!(result, Err(ConsoleError::Rejected { .. })));
        assert!(screen.list().get("p1").is_some());
    }

    #[tokio::test]
    async fn test_assign_refuses_disabled_user() {
        let server = MockServer::start_async().await;
        let screen = loaded_screen(&server).await;
        server.mock(|when, then| {
            when.method(GET).path("/get_all_users");
            then.status(200).json_body(json!({
                "message": "Users retrieved successfully",
                "users": [
                    {"id": "u2", "name": "Ada", "email": "ada@x.com", "status": "active"},
                    {"id": "u3", "name": "Bob", "email": "bob@x.com", "status": "disabled"}
                ]
            }));
        });
        let assign = server.mock(|when, then| {
            when.method(POST)
                .path("/assign_product")
                .json_body(json!({"productid": "p1", "userid": "u2"}));
            then.status(200).json_body(json!({"message": "assigned"}));
        });

        let dialog = screen.open_assign(&ProductId::new("p1")).await.unwrap();
        assert!(dialog.suggest("  ").is_empty());
        assert_eq!(dialog.suggest("ADA").len(), 1);
        assert_eq!(dialog.suggest("x.com").len(), 2);

        let refused = screen
            .assign(&dialog, &UserId::new("u3"), &AssumeYes)
            .await;
        assert!(matches!(refused, Err(ConsoleError::NotAllowed(_))));

        let outcome = screen
            .assign(&dialog, &UserId::new("u2"), &AssumeYes)
            .await
            .unwrap();
        assert_eq!(outcome, Some(AssignOutcome::Assigned));
        assign.assert_hits(1);
        assert_eq!(screen.list().get("p1").unwrap().userid.as_str(), "u2");
    }

    #[tokio::test]
    async fn test_edit_path_uses_owner() {
        let server = MockServer::start_async().await;
        let screen = loaded_screen(&server).await;
        assert_eq!(
            screen.edit_path(&ProductId::new("p1")).unwrap(),
            "/home/update-product/p1/u1"
        );
        assert!(screen.edit_path(&ProductId::new("zz")).is_err());
    }
}
