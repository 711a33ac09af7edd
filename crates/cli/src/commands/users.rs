//! User commands.

use catalog_admin::routing::Screen;
use catalog_admin::screens::{UsersScreen, average_rating};
use catalog_admin_core::UserId;

use super::{CliError, Context, load_pages, report_mutation};
use crate::output;

async fn open(ctx: &Context) -> Result<UsersScreen, CliError> {
    ctx.require_session(Screen::Users.template())?;
    let screen = UsersScreen::new(ctx.console.clone());
    screen.load().await?;
    Ok(screen)
}

/// List users, optionally filtered.
///
/// # Errors
///
/// Returns error when not signed in or the list fails to load.
pub async fn list(ctx: &Context, search: Option<&str>) -> Result<(), CliError> {
    let screen = open(ctx).await?;
    let users = match search {
        Some(query) => screen.search(query),
        None => screen.users(),
    };
    output::table(&users, "No users found.");
    Ok(())
}

/// Enable or disable a user.
///
/// # Errors
///
/// Returns `NotFound` for an unknown user, or the call's error.
pub async fn toggle(ctx: &Context, userid: &UserId) -> Result<(), CliError> {
    let screen = open(ctx).await?;
    let outcome = screen.toggle_status(userid, ctx.confirm()).await?;
    let status = screen
        .list()
        .get(userid.as_str())
        .map(|u| u.status.to_string())
        .unwrap_or_default();
    report_mutation(outcome, &format!("User is now {status}."));
    Ok(())
}

/// Remove a user.
///
/// # Errors
///
/// Returns `NotFound` for an unknown user, or the call's error.
pub async fn remove(ctx: &Context, userid: &UserId) -> Result<(), CliError> {
    let screen = open(ctx).await?;
    let outcome = screen.remove(userid, ctx.confirm()).await?;
    report_mutation(outcome, "User removed successfully.");
    Ok(())
}

/// List the products a user owns.
///
/// # Errors
///
/// Returns `NotFound` for an unknown user, or the fetch error.
pub async fn products(ctx: &Context, userid: &UserId) -> Result<(), CliError> {
    let screen = open(ctx).await?;
    let drawer = screen.open_products(userid).await?;
    output::note(&format!("Products of {}", drawer.user.name));
    output::table(&drawer.products, "No products yet.");
    Ok(())
}

/// List a user's reviews.
///
/// # Errors
///
/// Returns `NotFound` for an unknown user, or a page error.
pub async fn reviews(ctx: &Context, userid: &UserId, pages: u32) -> Result<(), CliError> {
    let screen = open(ctx).await?;
    let drawer = screen.open_reviews(userid).await?;
    load_pages(pages, || drawer.load_more()).await?;

    let reviews = drawer.reviews();
    output::note(&format!(
        "Reviews by {} - average experience {}",
        drawer.title(),
        average_rating(&reviews)
    ));
    output::table(&reviews, "No reviews yet.");
    if drawer.has_more() {
        output::note("More reviews available; pass --pages to load them.");
    }
    Ok(())
}
