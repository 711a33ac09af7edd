//! Product commands.
//!
//! # Usage
//!
//! ```bash
//! catalog-admin products list --pages 3 --search vision
//! catalog-admin products toggle p-17
//! catalog-admin products assign p-17 --to jane@example.com
//! catalog-admin products export p-17 > p-17.yaml
//! catalog-admin products update p-17 --owner u-3 --file p-17.yaml --image logo.png
//! ```
//!
//! Mutations act on loaded products only, so they page through the admin
//! feed until the product shows up.

use std::path::Path;

use catalog_admin::ConsoleError;
use catalog_admin::api::{AssignOutcome, ProductImage};
use catalog_admin::forms::ProductForm;
use catalog_admin::routing::{Screen, update_product_path};
use catalog_admin::screens::{ProductEditor, ProductsScreen, average_rating};
use catalog_admin::table::render;
use catalog_admin_core::{EntityKind, Product, ProductId, User, UserId};

use super::{CliError, Context, load_pages, report_mutation};
use crate::output;

/// Load the products screen with `pages` pages.
async fn open(ctx: &Context, pages: u32) -> Result<ProductsScreen, CliError> {
    ctx.require_session(Screen::ProductsAll.template())?;
    let screen = ProductsScreen::new(ctx.console.clone());
    screen.load().await?;
    load_pages(pages, || screen.load_more()).await?;
    Ok(screen)
}

/// Load pages until `productid` is among the loaded products.
async fn open_with(
    ctx: &Context,
    productid: &ProductId,
    max_pages: u32,
) -> Result<ProductsScreen, CliError> {
    let screen = open(ctx, 1).await?;
    let mut loaded = 1;
    while screen.list().get(productid.as_str()).is_none() && loaded < max_pages {
        if !screen.list().has_more() {
            break;
        }
        screen.load_more().await?;
        loaded += 1;
    }
    if screen.list().get(productid.as_str()).is_none() {
        return Err(ConsoleError::NotFound {
            kind: EntityKind::Product,
            id: productid.to_string(),
        }
        .into());
    }
    Ok(screen)
}

fn print_products(screen: &ProductsScreen, products: &[Product]) {
    if products.is_empty() {
        output::note("No products found.");
        return;
    }
    let (mut headers, mut rows) = render(products);
    headers.push("Reviews");
    for (row, product) in rows.iter_mut().zip(products) {
        row.push(screen.review_count(&product.productid).to_string());
    }
    output::grid(&headers, &rows);
}

/// List loaded products, optionally filtered.
///
/// # Errors
///
/// Returns error when not signed in or a page fails to load.
pub async fn list(ctx: &Context, pages: u32, search: Option<&str>) -> Result<(), CliError> {
    let screen = open(ctx, pages).await?;
    let products = match search {
        Some(query) => screen.search(query),
        None => screen.products(),
    };
    print_products(&screen, &products);
    if screen.list().has_more() {
        output::note("More products available; pass --pages to load them.");
    }
    Ok(())
}

/// Print one product's full details.
///
/// # Errors
///
/// Returns `NotFound` when the backend does not know the product.
pub async fn show(ctx: &Context, productid: &ProductId) -> Result<(), CliError> {
    ctx.require_session(Screen::ProductsAll.template())?;
    let details = ctx
        .console
        .api()
        .product_details(productid)
        .await?
        .ok_or_else(|| ConsoleError::NotFound {
            kind: EntityKind::Product,
            id: productid.to_string(),
        })?;
    let form = ProductForm::from_details(&details);
    let product = details.into_product();

    output::fields(&[
        ("ID", product.productid.to_string()),
        ("Name", product.productname.clone()),
        ("Owner", product.userid.to_string()),
        ("Status", product.status.to_string()),
        ("Category", product.productcategory.clone()),
        ("Technology", product.producttechnology.clone()),
        ("License", product.productlicense.clone()),
        ("Funding stage", product.productfundingstage.clone()),
        ("Website", product.productwebsite.clone()),
        ("Documentation", product.productdocumentation.clone()),
        ("Rating", format!("{:.1}", product.rating)),
        ("Featured", (product.is_featured != 0).to_string()),
        ("Created", product.createddate.clone()),
        ("Description", product.productdescription.clone()),
    ]);
    let lists: Vec<(&str, String)> = form
        .list_fields()
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(label, values)| (label, values.join(", ")))
        .collect();
    output::fields(&lists);
    Ok(())
}

/// Activate or deactivate a product.
///
/// # Errors
///
/// Returns `NotFound` when the product is not within `pages` pages, or
/// the call's error.
pub async fn toggle(ctx: &Context, productid: &ProductId, pages: u32) -> Result<(), CliError> {
    let screen = open_with(ctx, productid, pages).await?;
    let outcome = screen.toggle_status(productid, ctx.confirm()).await?;
    let status = screen
        .list()
        .get(productid.as_str())
        .map(|p| p.status.to_string())
        .unwrap_or_default();
    report_mutation(outcome, &format!("Product is now {status}."));
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns `NotFound` when the product is not within `pages` pages, or
/// the call's error.
pub async fn delete(ctx: &Context, productid: &ProductId, pages: u32) -> Result<(), CliError> {
    let screen = open_with(ctx, productid, pages).await?;
    let outcome = screen.delete(productid, ctx.confirm()).await?;
    report_mutation(outcome, "Product deleted successfully.");
    Ok(())
}

/// Assign a product to the user matching `to` by email or name.
///
/// # Errors
///
/// Returns a usage error unless exactly one user matches, `NotAllowed` for
/// a disabled user, or the call's error.
pub async fn assign(
    ctx: &Context,
    productid: &ProductId,
    to: &str,
    pages: u32,
) -> Result<(), CliError> {
    let screen = open_with(ctx, productid, pages).await?;
    let dialog = screen.open_assign(productid).await?;

    let matches = dialog.suggest(to);
    let exact: Vec<&User> = matches
        .iter()
        .copied()
        .filter(|u| u.email.eq_ignore_ascii_case(to.trim()))
        .collect();
    let user = match (exact.as_slice(), matches.as_slice()) {
        ([user], _) | ([], [user]) => (*user).clone(),
        (_, []) => return Err(CliError::Usage(format!("No user matches \"{to}\"."))),
        _ => {
            let candidates: Vec<User> = matches.iter().map(|u| (*u).clone()).collect();
            output::table(&candidates, "No users.");
            return Err(CliError::Usage(format!(
                "\"{to}\" matches several users; use a full email address."
            )));
        }
    };

    match screen.assign(&dialog, user.key(), ctx.confirm()).await? {
        None => output::note("Cancelled."),
        Some(AssignOutcome::Assigned) => {
            output::success(&AssignOutcome::Assigned.user_text(&user.name));
        }
        Some(AssignOutcome::AlreadyYours) => {
            output::note(&AssignOutcome::AlreadyYours.user_text(&user.name));
        }
        Some(AssignOutcome::ProductNotFound) => {
            return Err(CliError::Usage(
                AssignOutcome::ProductNotFound.user_text(&user.name),
            ));
        }
    }
    Ok(())
}

/// List a product's reviews.
///
/// # Errors
///
/// Returns `NotFound` when the product is not within `product_pages`
/// pages, or a page error.
pub async fn reviews(
    ctx: &Context,
    productid: &ProductId,
    pages: u32,
    product_pages: u32,
) -> Result<(), CliError> {
    let screen = open_with(ctx, productid, product_pages).await?;
    let drawer = screen.open_reviews(productid).await?;
    load_pages(pages, || drawer.load_more()).await?;

    let reviews = drawer.reviews();
    output::note(&format!(
        "{} - average experience {}",
        drawer.title(),
        average_rating(&reviews)
    ));
    output::table(&reviews, "No reviews yet.");
    if drawer.has_more() {
        output::note("More reviews available; pass --pages to load them.");
    }
    Ok(())
}

async fn read_form(file: &Path) -> Result<ProductForm, CliError> {
    let raw = tokio::fs::read_to_string(file).await?;
    Ok(serde_yaml::from_str(&raw)?)
}

async fn read_image(image: Option<&Path>) -> Result<Option<ProductImage>, CliError> {
    let Some(path) = image else {
        return Ok(None);
    };
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(ProductImage::new(file_name, bytes)))
}

/// Create a product owned by the signed-in admin.
///
/// # Errors
///
/// Returns error when a file cannot be read, the form is invalid, or the
/// backend refuses the product.
pub async fn create(ctx: &Context, file: &Path, image: Option<&Path>) -> Result<(), CliError> {
    let route = ctx.console.enter(Screen::AddProduct.template())?;
    let mut editor = ProductEditor::from_route(ctx.console.clone(), &route).await?;
    editor.set_form(read_form(file).await?);
    editor.set_image(read_image(image).await?);
    editor.submit().await?;
    output::success("Product created successfully.");
    Ok(())
}

/// Replace a product's details.
///
/// # Errors
///
/// Returns error when a file cannot be read, the product is unknown, the
/// form is invalid, or the backend refuses the update.
pub async fn update(
    ctx: &Context,
    productid: &ProductId,
    owner: &UserId,
    file: &Path,
    image: Option<&Path>,
) -> Result<(), CliError> {
    let path = update_product_path(productid.as_str(), owner.as_str());
    let route = ctx.console.enter(&path)?;
    let mut editor = ProductEditor::from_route(ctx.console.clone(), &route).await?;
    editor.set_form(read_form(file).await?);
    editor.set_image(read_image(image).await?);
    editor.submit().await?;
    output::success("Product updated successfully.");
    Ok(())
}

/// Print a product's editable fields as YAML.
///
/// # Errors
///
/// Returns `NotFound` when the backend does not know the product.
pub async fn export(ctx: &Context, productid: &ProductId) -> Result<(), CliError> {
    ctx.require_session(Screen::ProductsAll.template())?;
    let editor =
        ProductEditor::edit(ctx.console.clone(), productid.clone(), UserId::default()).await?;
    output::text(&serde_yaml::to_string(editor.form())?);
    Ok(())
}
