use tracing::instrument;

use catalog_admin_core::{TaxonomyEntry, TaxonomyId, TaxonomyKind};

use crate::confirm::Confirm;
use crate::error::ConsoleError;
use crate::forms::TaxonomyForm;
use crate::list::feeds::TaxonomyFeed;
use crate::list::{ListController, LoadOutcome, LocalChange, MutationOutcome};
use crate::state::Console;

/// Category, technology or use-case management; one screen type serves all three.
#[derive(Debug)]
pub struct TaxonomyScreen {
    console: Console,
    kind: TaxonomyKind,
    list: ListController<TaxonomyFeed>,
}

impl TaxonomyScreen {
    #[must_use]
    pub fn new(console: Console, kind: TaxonomyKind) -> Self {
        let list = ListController::new(
            TaxonomyFeed::new(console.api().clone(), kind),
            console.list_options(),
        );
        Self {
            console,
            kind,
            list,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TaxonomyKind {
        self.kind
    }

    #[must_use]
    pub const fn list(&self) -> &ListController<TaxonomyFeed> {
        &self.list
    }

    #[must_use]
    pub fn entries(&self) -> Vec<TaxonomyEntry> {
        self.list.visible()
    }

    /// Fetch every entry.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; loaded entries stay.
    pub async fn load(&self) -> Result<LoadOutcome, ConsoleError> {
        self.list.load_page(true).await
    }

    pub fn search(&self, query: &str) -> Vec<TaxonomyEntry> {
        self.list.search(query)
    }

    /// Validate and create an entry, then reload so it shows with its new id.
    ///
    /// # Errors
    ///
    /// Returns `Validation` before any request, `Unauthenticated` without a
    /// session marker, or the call's error.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub async fn create(&self, name: &str) -> Result<(), ConsoleError> {
        let name = TaxonomyForm::new(self.kind, name).validate()?;
        let admin = self.console.admin_id()?;
        self.console
            .api()
            .create_taxonomy(self.kind, &admin, &name)
            .await?;
        self.list.load_page(true).await?;
        Ok(())
    }

    /// Validate and rename an entry in place.
    ///
    /// # Errors
    ///
    /// Returns `Validation` before any request, `NotFound` for an entry that
    /// is not loaded, `Unauthenticated` without a session marker, or the
    /// call's error.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub async fn rename(&self, id: &TaxonomyId, name: &str) -> Result<(), ConsoleError> {
        let name = TaxonomyForm::new(self.kind, name).validate()?;
        if self.list.get(id.as_str()).is_none() {
            return Err(ConsoleError::NotFound {
                kind: self.kind.entity_kind(),
                id: id.to_string(),
            });
        }
        let admin = self.console.admin_id()?;
        self.console
            .api()
            .update_taxonomy(self.kind, &admin, id, &name)
            .await?;
        self.list.patch(id.as_str(), |entry| entry.name = name);
        Ok(())
    }

    /// Delete an entry after confirmation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an entry that is not loaded, `Unauthenticated`
    /// without a session marker, or the call's error.
    #[instrument(skip(self, confirm), fields(kind = %self.kind))]
    pub async fn delete(
        &self,
        id: &TaxonomyId,
        confirm: &dyn Confirm,
    ) -> Result<MutationOutcome, ConsoleError> {
        let entry = self
            .list
            .get(id.as_str())
            .ok_or_else(|| ConsoleError::NotFound {
                kind: self.kind.entity_kind(),
                id: id.to_string(),
            })?;
        let admin = self.console.admin_id()?;
        let prompt = format!("Are you sure you want to delete \"{}\"?", entry.name);
        self.list
            .confirm_and_apply(
                id.as_str(),
                confirm,
                &prompt,
                self.console.api().delete_taxonomy(self.kind, &admin, id),
                LocalChange::Remove,
            )
            .await
    }
}
