//! Product endpoints.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use catalog_admin_core::types::de::{lenient_i64, lenient_string, lenient_string_list};
use catalog_admin_core::{Product, ProductId, ProductStatus, UserId};

use super::ApiClient;
use super::types::{MessageResponse, messages, require_message};
use crate::error::ConsoleError;
use crate::forms::ProductForm;

/// One page of the admin product feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

/// A product with its related name lists, as returned by `get_product_details`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductDetails {
    pub product: Product,
    #[serde(rename = "useCases", deserialize_with = "lenient_string_list")]
    pub use_cases: Vec<String>,
    #[serde(rename = "baseModels", deserialize_with = "lenient_string_list")]
    pub base_models: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub deployments: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub founders: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub repositories: Vec<String>,
    #[serde(rename = "mediaPreviews", deserialize_with = "lenient_string_list")]
    pub media_previews: Vec<String>,
}

impl ProductDetails {
    /// Fold the related lists into the product record.
    #[must_use]
    pub fn into_product(self) -> Product {
        Product {
            usecasenames: self.use_cases,
            baseaimodelnames: self.base_models,
            deploymentnames: self.deployments,
            foundernames: self.founders,
            repositorylinks: self.repositories,
            medialinks: self.media_previews,
            ..self.product
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductDetailsResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(flatten)]
    details: ProductDetails,
}

#[derive(Debug, Deserialize)]
struct UserProductsResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ReviewCount {
    productid: ProductId,
    #[serde(default, deserialize_with = "lenient_i64")]
    count: i64,
}

#[derive(Debug, Deserialize)]
struct ReviewCountsResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    message: String,
    #[serde(default)]
    review_counts: Vec<ReviewCount>,
}

/// Result of assigning a product to a new owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned,
    AlreadyYours,
    ProductNotFound,
}

impl AssignOutcome {
    /// Text shown to the operator; `owner` is the target user's name.
    #[must_use]
    pub fn user_text(self, owner: &str) -> String {
        match self {
            Self::Assigned => format!("Product successfully assigned to {owner}!"),
            Self::AlreadyYours => format!("This product already belongs to {owner}."),
            Self::ProductNotFound => "Product not found.".to_string(),
        }
    }
}

/// Image attached to a product create or update.
#[derive(Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ProductImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductImage")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ProductImage {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// MIME type guessed from the file extension.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }

    /// Standard base64 of the raw bytes, without a data-URL prefix.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

/// JSON body of `update_product_details`.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateProductPayload<'a> {
    productid: &'a ProductId,
    userid: &'a UserId,
    productname: &'a str,
    productcategory: &'a str,
    productlicense: &'a str,
    producttechnology: &'a str,
    productwebsite: &'a str,
    productfundingstage: &'a str,
    productdescription: &'a str,
    productfacebook: &'a str,
    productlinkedin: &'a str,
    documentationlink: &'a str,
    #[serde(rename = "isFeatured")]
    is_featured: u8,
    founders: Vec<String>,
    #[serde(rename = "baseModels")]
    base_models: Vec<String>,
    deployments: Vec<String>,
    #[serde(rename = "mediaPreviews")]
    media_previews: Vec<String>,
    repositories: Vec<String>,
    #[serde(rename = "useCases")]
    use_cases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    productimage: Option<String>,
}

impl<'a> UpdateProductPayload<'a> {
    pub(crate) fn new(
        productid: &'a ProductId,
        owner: &'a UserId,
        form: &'a ProductForm,
        image: Option<&ProductImage>,
    ) -> Self {
        Self {
            productid,
            userid: owner,
            productname: form.name.trim(),
            productcategory: form.category.trim(),
            productlicense: form.license.trim(),
            producttechnology: form.technology.trim(),
            productwebsite: form.website.trim(),
            productfundingstage: form.funding_stage.trim(),
            productdescription: form.description.trim(),
            productfacebook: form.facebook.trim(),
            productlinkedin: form.linkedin.trim(),
            documentationlink: form.documentation_link.trim(),
            is_featured: u8::from(form.is_featured),
            founders: form.founders(),
            base_models: form.base_models(),
            deployments: form.deployments(),
            media_previews: form.media_previews(),
            repositories: form.repositories(),
            use_cases: form.use_cases(),
            productimage: image.map(ProductImage::to_base64),
        }
    }
}

/// Multipart body of `insert_product`: scalar fields, indexed list fields and
/// an optional `productImage` file part.
fn insert_form(
    form: &ProductForm,
    owner: &UserId,
    image: Option<&ProductImage>,
) -> Result<Form, ConsoleError> {
    let mut multipart = Form::new()
        .text("name", form.name.trim().to_string())
        .text("type", form.category.trim().to_string())
        .text("license", form.license.trim().to_string())
        .text("technology", form.technology.trim().to_string())
        .text("website", form.website.trim().to_string())
        .text("fundingStage", form.funding_stage.trim().to_string())
        .text("productdescription", form.description.trim().to_string())
        .text("documentationlink", form.documentation_link.trim().to_string())
        .text("productfb", form.facebook.trim().to_string())
        .text("productlinkedin", form.linkedin.trim().to_string())
        .text("isFeatured", if form.is_featured { "1" } else { "0" })
        .text("userid", owner.to_string());

    for (field, values) in form.list_fields() {
        for (i, value) in values.into_iter().enumerate() {
            multipart = multipart.text(format!("{field}[{i}]"), value);
        }
    }

    if let Some(image) = image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type())
            .map_err(super::ApiError::from)?;
        multipart = multipart.part("productImage", part);
    }

    Ok(multipart)
}

impl ApiClient {
    /// Fetch one page of the admin product feed.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure.
    #[instrument(skip(self))]
    pub async fn product_page(&self, page: u32, limit: u32) -> Result<ProductPage, ConsoleError> {
        #[derive(Serialize)]
        struct Body {
            page: u32,
            limit: u32,
        }
        let page: ProductPage = self
            .post_json("get_all_product_details_all_admin", &Body { page, limit })
            .await?;
        debug!(
            count = page.products.len(),
            total = ?page.total,
            has_more = ?page.has_more,
            "Product page received"
        );
        Ok(page)
    }

    /// Products owned by one user; any answer but "yes" yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure.
    #[instrument(skip(self))]
    pub async fn user_products(
        &self,
        userid: &UserId,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Product>, ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            userid: &'a UserId,
            page: u32,
            limit: u32,
        }
        let response: UserProductsResponse = self
            .post_json(
                "get_all_product_details",
                &Body {
                    userid,
                    page,
                    limit,
                },
            )
            .await?;
        if response.message == messages::YES {
            Ok(response.products)
        } else {
            debug!(message = %response.message, "User has no products");
            Ok(Vec::new())
        }
    }

    /// Full details of one product, or `None` when the backend does not know it.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure.
    #[instrument(skip(self))]
    pub async fn product_details(
        &self,
        productid: &ProductId,
    ) -> Result<Option<ProductDetails>, ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            productid: &'a ProductId,
        }
        let response: ProductDetailsResponse = self
            .post_json("get_product_details", &Body { productid })
            .await?;
        if response.message == messages::YES {
            Ok(Some(response.details))
        } else {
            warn!(message = %response.message, "Product details not found");
            Ok(None)
        }
    }

    /// Review counts for a set of products.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a message other than "success".
    #[instrument(skip(self, product_ids), fields(count = product_ids.len()))]
    pub async fn review_counts(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, u64>, ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            product_ids: &'a [ProductId],
        }
        let response: ReviewCountsResponse = self
            .post_json("product_comparison_review_count", &Body { product_ids })
            .await?;
        require_message("load review counts", &response.message, messages::SUCCESS)?;
        Ok(response
            .review_counts
            .into_iter()
            .map(|c| (c.productid, u64::try_from(c.count).unwrap_or(0)))
            .collect())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a message other than "deleted".
    #[instrument(skip(self))]
    pub async fn delete_product(&self, productid: &ProductId) -> Result<(), ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            productid: &'a ProductId,
        }
        let response: MessageResponse = self
            .post_json("delete_product", &Body { productid })
            .await?;
        response.require("delete product", messages::DELETED)?;
        info!(productid = %productid, "Product deleted");
        Ok(())
    }

    /// Set a product's status.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an unexpected message.
    #[instrument(skip(self))]
    pub async fn set_product_status(
        &self,
        productid: &ProductId,
        owner: &UserId,
        status: ProductStatus,
    ) -> Result<(), ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            productid: &'a ProductId,
            userid: &'a UserId,
            status: ProductStatus,
        }
        let response: MessageResponse = self
            .post_json(
                "toggle_product_status",
                &Body {
                    productid,
                    userid: owner,
                    status,
                },
            )
            .await?;
        response.require("update product status", messages::PRODUCT_STATUS_UPDATED)?;
        info!(productid = %productid, status = %status, "Product status updated");
        Ok(())
    }

    /// Move a product to another owner.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an unknown message.
    #[instrument(skip(self))]
    pub async fn assign_product(
        &self,
        productid: &ProductId,
        userid: &UserId,
    ) -> Result<AssignOutcome, ConsoleError> {
        #[derive(Serialize)]
        struct Body<'a> {
            productid: &'a ProductId,
            userid: &'a UserId,
        }
        let response: MessageResponse = self
            .post_json("assign_product", &Body { productid, userid })
            .await?;
        let outcome = match response.message.as_str() {
            messages::ASSIGNED => AssignOutcome::Assigned,
            messages::ALREADY_YOURS => AssignOutcome::AlreadyYours,
            messages::PRODUCT_NOT_FOUND => AssignOutcome::ProductNotFound,
            other => {
                warn!(message = other, "Assign rejected");
                return Err(ConsoleError::Rejected {
                    operation: "assign product",
                    message: response.message,
                });
            }
        };
        info!(productid = %productid, userid = %userid, outcome = ?outcome, "Assign answered");
        Ok(outcome)
    }

    /// Create a product owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a message other than "yes".
    #[instrument(skip(self, form, image), fields(name = %form.name))]
    pub async fn insert_product(
        &self,
        form: &ProductForm,
        owner: &UserId,
        image: Option<&ProductImage>,
    ) -> Result<(), ConsoleError> {
        let multipart = insert_form(form, owner, image)?;
        let response: MessageResponse = self.post_form("insert_product", multipart).await?;
        response.require("create product", messages::YES)?;
        info!(name = %form.name, "Product created");
        Ok(())
    }

    /// Replace a product's details.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a message other than "success".
    #[instrument(skip(self, form, image), fields(productid = %productid))]
    pub async fn update_product(
        &self,
        productid: &ProductId,
        owner: &UserId,
        form: &ProductForm,
        image: Option<&ProductImage>,
    ) -> Result<(), ConsoleError> {
        let payload = UpdateProductPayload::new(productid, owner, form, image);
        let response: MessageResponse = self
            .post_json("update_product_details", &payload)
            .await?;
        response.require("update product", messages::SUCCESS)?;
        info!(productid = %productid, "Product updated");
        Ok(())
    }
}
