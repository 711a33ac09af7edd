use tracing::{info, instrument};

use catalog_admin_core::{EntityKind, ProductId, UserId};

use crate::api::ProductImage;
use crate::error::ConsoleError;
use crate::forms::{ProductForm, suggest_use_cases};
use crate::routing::{RouteMatch, Screen};
use crate::state::Console;

/// Route the editor returns to after a successful save.
pub const PRODUCTS_ROUTE: &str = "/home/products-all";

/// Whether the editor creates a product or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create { owner: UserId },
    Edit { productid: ProductId, owner: UserId },
}

/// Product create/edit screen.
#[derive(Debug, Clone)]
pub struct ProductEditor {
    console: Console,
    mode: EditorMode,
    form: ProductForm,
    image: Option<ProductImage>,
}

impl ProductEditor {
    /// Empty editor for a new product owned by `owner`.
    #[must_use]
    pub fn create(console: Console, owner: UserId) -> Self {
        Self {
            console,
            mode: EditorMode::Create { owner },
            form: ProductForm::default(),
            image: None,
        }
    }

    /// Editor pre-filled from the backend's copy of a product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the backend does not know the product, or the
    /// fetch error.
    #[instrument(skip(console))]
    pub async fn edit(
        console: Console,
        productid: ProductId,
        owner: UserId,
    ) -> Result<Self, ConsoleError> {
        let details = console
            .api()
            .product_details(&productid)
            .await?
            .ok_or_else(|| ConsoleError::NotFound {
                kind: EntityKind::Product,
                id: productid.to_string(),
            })?;
        Ok(Self {
            console,
            mode: EditorMode::Edit { productid, owner },
            form: ProductForm::from_details(&details),
            image: None,
        })
    }

    /// Editor for the add-product or update-product route.
    ///
    /// New products belong to the signed-in admin.
    ///
    /// # Errors
    ///
    /// Returns `NotAllowed` for any other route, `Unauthenticated` when a
    /// new product has no owner, or the fetch error in edit mode.
    pub async fn from_route(console: Console, route: &RouteMatch) -> Result<Self, ConsoleError> {
        match route.screen {
            Screen::AddProduct => {
                let owner = console.owner_id()?;
                Ok(Self::create(console, owner))
            }
            Screen::UpdateProduct => {
                let productid = route.param("productid").unwrap_or_default();
                let owner = route.param("userid").unwrap_or_default();
                Self::edit(console, ProductId::new(productid), UserId::new(owner)).await
            }
            other => Err(ConsoleError::NotAllowed(format!(
                "{other:?} is not a product editor route"
            ))),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    #[must_use]
    pub const fn form(&self) -> &ProductForm {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    /// Replace the whole form, e.g. with one read from a file.
    pub fn set_form(&mut self, form: ProductForm) {
        self.form = form;
    }

    pub fn set_image(&mut self, image: Option<ProductImage>) {
        self.image = image;
    }

    /// Use-case picker suggestions for `input`.
    #[must_use]
    pub fn suggestions(&self, input: &str) -> Vec<&'static str> {
        suggest_use_cases(input, &self.form.use_cases)
    }

    /// Validate and save; returns the route to go to next.
    ///
    /// # Errors
    ///
    /// Returns `Validation` before any request, or the call's error.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn submit(&self) -> Result<&'static str, ConsoleError> {
        self.form.validate()?;
        let api = self.console.api();
        match &self.mode {
            EditorMode::Create { owner } => {
                api.insert_product(&self.form, owner, self.image.as_ref())
                    .await?;
            }
            EditorMode::Edit { productid, owner } => {
                api.update_product(productid, owner, &self.form, self.image.as_ref())
                    .await?;
            }
        }
        info!(name = %self.form.name, "Product saved");
        Ok(PRODUCTS_ROUTE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::config::ConsoleConfig;
    use crate::routing::{Resolution, resolve};

    fn console(server: &MockServer) -> Console {
        let config = ConsoleConfig {
            api_url: server.url("/").parse().unwrap(),
            ..ConsoleConfig::default()
        };
        Console::with_store(config, None).unwrap()
    }

    fn valid_form() -> ProductForm {
        ProductForm {
            name: "Vision".to_string(),
            category: "AI".to_string(),
            license: "MIT".to_string(),
            technology: "ML".to_string(),
            website: "https://vision.example".to_string(),
            funding_stage: "Seed".to_string(),
            description: "Sees things".to_string(),
            founders: vec!["Ada".to_string()],
            base_models: vec!["GPT".to_string()],
            deployments: vec!["Cloud".to_string()],
            ..ProductForm::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let server = MockServer::start_async().await;
        let insert = server.mock(|when, then| {
            when.method(POST).path("/insert_product");
            then.status(200).json_body(json!({"message": "yes"}));
        });
        let editor = ProductEditor::create(console(&server), UserId::new("42"));

        let result = editor.submit().await;

        assert!(matches!(result, Err(ConsoleError::Validation(_))));
        insert.assert_hits(0);
    }

    #[tokio::test]
    async fn test_create_posts_multipart() {
        let server = MockServer::start_async().await;
        let insert = server.mock(|when, then| {
            when.method(POST).path("/insert_product");
            then.status(200).json_body(json!({"message": "yes"}));
        });
        let mut editor = ProductEditor::create(console(&server), UserId::new("42"));
        editor.set_form(valid_form());
        editor.set_image(Some(ProductImage::new("logo.png", vec![1, 2, 3])));

        assert_eq!(editor.submit().await.unwrap(), PRODUCTS_ROUTE);
        insert.assert();
    }

    #[tokio::test]
    async fn test_edit_from_route() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/get_product_details")
                .json_body(json!({"productid": "p1"}));
            then.status(200).json_body(json!({
                "message": "yes",
                "product": {
                    "productid": "p1",
                    "productname": "Vision",
                    "productwebsite": "https://vision.example"
                },
                "founders": ["Ada"],
                "useCases": ["Chatbot"]
            }));
        });
        let update = server.mock(|when, then| {
            when.method(POST).path("/update_product_details");
            then.status(200).json_body(json!({"message": "success"}));
        });

        let Resolution::Screen(route) = resolve("/home/update-product/p1/u9") else {
            panic!("route should resolve");
        };
        let mut editor = ProductEditor::from_route(console(&server), &route)
            .await
            .unwrap();

        assert_eq!(
            editor.mode(),
            &EditorMode::Edit {
                productid: ProductId::new("p1"),
                owner: UserId::new("u9"),
            }
        );
        assert_eq!(editor.form().name, "Vision");
        assert_eq!(editor.form().founders, vec!["Ada".to_string()]);
        assert!(editor.suggestions("chat").is_empty());

        let mut form = valid_form();
        form.use_cases = editor.form().use_cases.clone();
        editor.set_form(form);
        editor.submit().await.unwrap();
        update.assert();
    }
}
