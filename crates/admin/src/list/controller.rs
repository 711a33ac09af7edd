use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info, instrument};

use catalog_admin_core::Entity;

use super::{Feed, ListOptions, ListState};
use crate::confirm::Confirm;
use crate::error::ConsoleError;

/// What a load call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was applied.
    Loaded { added: usize },
    /// Another load was in flight; this one was dropped.
    Busy,
    /// Nothing more to load.
    Exhausted,
}

/// What a confirmed mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Cancelled,
}

/// Local follow-up of a mutation the backend accepted.
pub enum LocalChange<T> {
    Remove,
    Patch(Box<dyn FnOnce(&mut T) + Send>),
}

impl<T> std::fmt::Debug for LocalChange<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remove => f.write_str("Remove"),
            Self::Patch(_) => f.write_str("Patch(..)"),
        }
    }
}

/// Resets the busy flag when a load ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Loads, filters and mutates one entity list.
///
/// At most one fetch is in flight; a load triggered while busy is dropped,
/// not queued.
pub struct ListController<F: Feed> {
    feed: F,
    state: RwLock<ListState<F::Item>>,
    busy: AtomicBool,
}

impl<F: Feed> std::fmt::Debug for ListController<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ListController")
            .field("loaded", &state.len())
            .field("cursor", state.cursor())
            .field("busy", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl<F: Feed> ListController<F> {
    #[must_use]
    pub fn new(feed: F, options: ListOptions) -> Self {
        Self {
            feed,
            state: RwLock::new(ListState::new(options)),
            busy: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn feed(&self) -> &F {
        &self.feed
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ListState<F::Item> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The filtered view.
    #[must_use]
    pub fn visible(&self) -> Vec<F::Item> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .visible()
            .to_vec()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<F::Item> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .has_more()
    }

    /// Fetch a page and apply it; `reset` starts over at page 1.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the state is left as it was.
    #[instrument(skip(self))]
    pub async fn load_page(&self, reset: bool) -> Result<LoadOutcome, ConsoleError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            debug!("Load already in flight, dropping trigger");
            return Ok(LoadOutcome::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let request = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .next_request(reset);
        let response = self.feed.fetch(&request).await?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let before = if reset { 0 } else { state.len() };
        *state = state.apply_page(reset, request, response);
        Ok(LoadOutcome::Loaded {
            added: state.len().saturating_sub(before),
        })
    }

    /// Load the next page when there is one and nothing is in flight.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the state is left as it was.
    pub async fn load_more(&self) -> Result<LoadOutcome, ConsoleError> {
        if self.is_loading() {
            return Ok(LoadOutcome::Busy);
        }
        if !self.has_more() {
            return Ok(LoadOutcome::Exhausted);
        }
        self.load_page(false).await
    }

    /// Filter loaded entities; returns the new view.
    pub fn search(&self, query: &str) -> Vec<F::Item> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.search(query).to_vec()
    }

    pub fn remove(&self, id: &str) -> Option<F::Item> {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn patch<C>(&self, id: &str, change: C) -> bool
    where
        C: FnOnce(&mut F::Item),
    {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .patch(id, change)
    }

    /// Confirm, call the backend, then apply `change` locally.
    ///
    /// Nothing is sent when the operator declines. When the call fails the
    /// entity keeps its prior state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is not loaded, or the call's error.
    pub async fn confirm_and_apply<Fut>(
        &self,
        id: &str,
        confirm: &dyn Confirm,
        prompt: &str,
        call: Fut,
        change: LocalChange<F::Item>,
    ) -> Result<MutationOutcome, ConsoleError>
    where
        Fut: Future<Output = Result<(), ConsoleError>> + Send,
    {
        let Some(entity) = self.get(id) else {
            return Err(ConsoleError::NotFound {
                kind: self.feed.kind(),
                id: id.to_string(),
            });
        };
        if !confirm.confirm(prompt) {
            debug!(id, "Mutation cancelled");
            return Ok(MutationOutcome::Cancelled);
        }

        call.await?;

        match change {
            LocalChange::Remove => {
                self.remove(id);
            }
            LocalChange::Patch(patch) => {
                self.patch(id, patch);
            }
        }
        info!(kind = %entity.kind(), id, "Mutation applied locally");
        Ok(MutationOutcome::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use catalog_admin_core::{EntityKind, Product, ProductId, ProductStatus};
    use tokio::sync::Notify;

    use super::*;
    use crate::api::ApiError;
    use crate::confirm::{AssumeNo, AssumeYes};
    use crate::list::{PageRequest, PageResponse};

    /// Serves `pages` in order; optionally waits on `gate` before answering.
    struct ScriptedFeed {
        pages: Vec<Result<Vec<&'static str>, ()>>,
        total: u64,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedFeed {
        fn new(pages: Vec<Result<Vec<&'static str>, ()>>, total: u64) -> Self {
            Self {
                pages,
                total,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl Feed for ScriptedFeed {
        type Item = Product;

        fn kind(&self) -> EntityKind {
            EntityKind::Product
        }

        async fn fetch(&self, _request: &PageRequest) -> Result<PageResponse<Product>, ConsoleError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.pages.get(call) {
                Some(Ok(ids)) => Ok(PageResponse {
                    items: ids
                        .iter()
                        .map(|id| Product {
                            productid: ProductId::new(*id),
                            productname: format!("Product {id}"),
                            ..Product::default()
                        })
                        .collect(),
                    total: Some(self.total),
                    has_more: None,
                }),
                _ => Err(ApiError::Parse("scripted failure".to_string()).into()),
            }
        }
    }

    fn options() -> ListOptions {
        ListOptions {
            page_size: 2,
            dedupe_ids: false,
        }
    }

    #[tokio::test]
    async fn test_load_then_more_until_exhausted() {
        let feed = ScriptedFeed::new(vec![Ok(vec!["a", "b"]), Ok(vec!["c"])], 3);
        let list = ListController::new(feed, options());

        assert_eq!(list.load_page(true).await.unwrap(), LoadOutcome::Loaded { added: 2 });
        assert_eq!(list.load_more().await.unwrap(), LoadOutcome::Loaded { added: 1 });
        assert_eq!(list.load_more().await.unwrap(), LoadOutcome::Exhausted);
        assert_eq!(list.feed().calls.load(Ordering::SeqCst), 2);
        assert_eq!(list.visible().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_state_intact() {
        let feed = ScriptedFeed::new(vec![Ok(vec!["a", "b"]), Err(())], 4);
        let list = ListController::new(feed, options());
        list.load_page(true).await.unwrap();

        let before = list.snapshot();
        assert!(list.load_more().await.is_err());
        let after = list.snapshot();
        assert_eq!(after.items(), before.items());
        assert_eq!(after.cursor(), before.cursor());
        assert!(!list.is_loading());
    }

    #[tokio::test]
    async fn test_failed_reset_keeps_previous_pages() {
        let feed = ScriptedFeed::new(vec![Ok(vec!["a", "b"]), Err(())], 4);
        let list = ListController::new(feed, options());
        list.load_page(true).await.unwrap();
        assert!(list.load_page(true).await.is_err());
        assert_eq!(list.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_trigger_is_dropped() {
        let gate = Arc::new(Notify::new());
        let mut feed = ScriptedFeed::new(vec![Ok(vec!["a", "b"]), Ok(vec!["c", "d"])], 4);
        feed.gate = Some(gate.clone());
        let list = Arc::new(ListController::new(feed, options()));

        let first = tokio::spawn({
            let list = list.clone();
            async move { list.load_page(true).await }
        });
        while !list.is_loading() {
            tokio::task::yield_now().await;
        }

        assert_eq!(list.load_page(false).await.unwrap(), LoadOutcome::Busy);
        assert_eq!(list.load_more().await.unwrap(), LoadOutcome::Busy);

        gate.notify_one();
        assert_eq!(
            first.await.unwrap().unwrap(),
            LoadOutcome::Loaded { added: 2 }
        );
        assert_eq!(list.feed().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_confirmed_patch_updates_in_place() {
        let feed = ScriptedFeed::new(vec![Ok(vec!["a", "b"])], 2);
        let list = ListController::new(feed, options());
        list.load_page(true).await.unwrap();

        let outcome = list
            .confirm_and_apply(
                "a",
                &AssumeYes,
                "Deactivate a?",
                async { Ok(()) },
                LocalChange::Patch(Box::new(|p: &mut Product| p.status = ProductStatus::Inactive)),
            )
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(list.get("a").unwrap().status, ProductStatus::Inactive);
        assert_eq!(list.feed().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_declined_mutation_sends_nothing() {
        let feed = ScriptedFeed::new(vec![Ok(vec!["a"])], 1);
        let list = ListController::new(feed, options());
        list.load_page(true).await.unwrap();

        let sent = AtomicBool::new(false);
        let outcome = list
            .confirm_and_apply(
                "a",
                &AssumeNo,
                "Delete a?",
                async {
                    sent.store(true, Ordering::SeqCst);
                    Ok(())
                },
                LocalChange::Remove,
            )
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Cancelled);
        assert!(!sent.load(Ordering::SeqCst));
        assert!(list.get("a").is_some());
    }

    #[tokio::test]
    async fn test_rejected_mutation_keeps_entity() {
        let feed = ScriptedFeed::new(vec![Ok(vec!["a"])], 1);
        let list = ListController::new(feed, options());
        list.load_page(true).await.unwrap();

        let result = list
            .confirm_and_apply(
                "a",
                &AssumeYes,
                "Delete a?",
                async {
                    Err(ConsoleError::Rejected {
                        operation: "delete product",
                        message: "nope".to_string(),
                    })
                },
                LocalChange::Remove,
            )
            .await;
        assert!(matches!(result, Err(ConsoleError::Rejected { .. })));
        assert!(list.get("a").is_some());

        let missing = list
            .confirm_and_apply("zz", &AssumeYes, "?", async { Ok(()) }, LocalChange::Remove)
            .await;
        assert!(matches!(missing, Err(ConsoleError::NotFound { .. })));
    }
}
