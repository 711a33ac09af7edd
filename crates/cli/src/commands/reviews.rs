//! Review commands.

use catalog_admin::routing::Screen;
use catalog_admin::screens::ReviewsScreen;
use catalog_admin_core::{ReviewId, UserId};

use super::{CliError, Context, report_mutation};
use crate::output;

async fn open(ctx: &Context) -> Result<ReviewsScreen, CliError> {
    ctx.require_session(Screen::ReviewsAll.template())?;
    let screen = ReviewsScreen::new(ctx.console.clone());
    screen.load().await?;
    Ok(screen)
}

/// List reviews a screenful at a time, or all with `all`.
///
/// # Errors
///
/// Returns error when not signed in or the reviews fail to load.
pub async fn list(ctx: &Context, search: Option<&str>, all: bool) -> Result<(), CliError> {
    let screen = open(ctx).await?;
    let mut reviews = match search {
        Some(query) => screen.search(query),
        None => screen.displayed(),
    };
    while all && screen.has_more_to_show() {
        reviews = screen.show_more();
    }

    output::note(&format!(
        "Average experience {} over {} reviews",
        screen.average_rating(),
        screen.list().snapshot().len()
    ));
    output::table(&reviews, "No reviews found.");
    if screen.has_more_to_show() {
        output::note("More reviews match; pass --all to show them.");
    }
    Ok(())
}

/// Delete a review.
///
/// # Errors
///
/// Returns `NotFound` for an unknown review, or the call's error.
pub async fn delete(ctx: &Context, reviewid: &ReviewId) -> Result<(), CliError> {
    let screen = open(ctx).await?;
    let outcome = screen.delete(reviewid, ctx.confirm()).await?;
    report_mutation(outcome, "Review deleted successfully.");
    Ok(())
}

/// Show a reviewer's profile.
///
/// # Errors
///
/// Returns `NotFound` when the backend does not know the user.
pub async fn user(ctx: &Context, userid: &UserId) -> Result<(), CliError> {
    ctx.require_session(Screen::ReviewsAll.template())?;
    let screen = ReviewsScreen::new(ctx.console.clone());
    let user = screen.show_user(userid).await?;
    output::fields(&[
        ("ID", user.key().to_string()),
        ("Name", user.name),
        ("Email", user.email),
        ("Designation", user.designation),
        ("Status", user.status.to_string()),
        ("LinkedIn", user.linkedin),
        ("Facebook", user.facebook),
        ("About", user.about_me),
        ("Joined", user.created_date),
    ]);
    Ok(())
}
