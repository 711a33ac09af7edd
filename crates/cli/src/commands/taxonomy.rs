//! Category, technology and use-case commands.
//!
//! # Usage
//!
//! ```bash
//! catalog-admin taxonomy list technology
//! catalog-admin taxonomy create usecase "Fraud detection"
//! catalog-admin taxonomy rename category 7 "Computer Vision"
//! catalog-admin taxonomy delete category 7
//! ```

use catalog_admin::routing::Screen;
use catalog_admin::screens::TaxonomyScreen;
use catalog_admin_core::{TaxonomyId, TaxonomyKind};

use super::{CliError, Context, report_mutation};
use crate::output;

const fn screen_of(kind: TaxonomyKind) -> Screen {
    match kind {
        TaxonomyKind::Category => Screen::Categories,
        TaxonomyKind::Technology => Screen::Technologies,
        TaxonomyKind::UseCase => Screen::UseCases,
    }
}

async fn open(ctx: &Context, kind: TaxonomyKind) -> Result<TaxonomyScreen, CliError> {
    ctx.require_session(screen_of(kind).template())?;
    let screen = TaxonomyScreen::new(ctx.console.clone(), kind);
    screen.load().await?;
    Ok(screen)
}

/// List entries, optionally filtered.
///
/// # Errors
///
/// Returns error when not signed in or the list fails to load.
pub async fn list(ctx: &Context, kind: TaxonomyKind, search: Option<&str>) -> Result<(), CliError> {
    let screen = open(ctx, kind).await?;
    let entries = match search {
        Some(query) => screen.search(query),
        None => screen.entries(),
    };
    output::table(&entries, "Nothing here yet.");
    Ok(())
}

/// Create an entry.
///
/// # Errors
///
/// Returns `Validation` for a bad name, or the call's error.
pub async fn create(ctx: &Context, kind: TaxonomyKind, name: &str) -> Result<(), CliError> {
    let screen = open(ctx, kind).await?;
    screen.create(name).await?;
    output::success(&format!("{kind} \"{}\" created.", name.trim()));
    Ok(())
}

/// Rename an entry.
///
/// # Errors
///
/// Returns `Validation` for a bad name, `NotFound` for an unknown entry,
/// or the call's error.
pub async fn rename(
    ctx: &Context,
    kind: TaxonomyKind,
    id: &TaxonomyId,
    name: &str,
) -> Result<(), CliError> {
    let screen = open(ctx, kind).await?;
    screen.rename(id, name).await?;
    output::success(&format!("{kind} {id} renamed."));
    Ok(())
}

/// Delete an entry.
///
/// # Errors
///
/// Returns `NotFound` for an unknown entry, or the call's error.
pub async fn delete(ctx: &Context, kind: TaxonomyKind, id: &TaxonomyId) -> Result<(), CliError> {
    let screen = open(ctx, kind).await?;
    let outcome = screen.delete(id, ctx.confirm()).await?;
    report_mutation(outcome, &format!("{kind} {id} deleted."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_protected_screen() {
        for kind in TaxonomyKind::ALL {
            assert!(screen_of(kind).is_protected());
        }
    }
}
