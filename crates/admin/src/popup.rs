//! Shared detail-popup state.
//!
//! Two independent slots, product and review, each holding the selected
//! entity and a visibility flag. Every list screen shares the same
//! coordinator, so opening a popup from one screen replaces whatever another
//! screen showed: at most one popup of a kind is visible at a time.
//!
//! Closing hides the popup immediately and drops its content after the
//! teardown delay, leaving time for an exit transition. A reopen inside that
//! window keeps the new content.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use catalog_admin_core::{Entity, Product, Review};

/// Which popup slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupKind {
    Product,
    Review,
}

/// An entity to show in its popup.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupSelection {
    Product(Product),
    Review(Review),
}

impl PopupSelection {
    #[must_use]
    pub const fn kind(&self) -> PopupKind {
        match self {
            Self::Product(_) => PopupKind::Product,
            Self::Review(_) => PopupKind::Review,
        }
    }
}

/// What observers of a slot see.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupState<T> {
    pub current: Option<T>,
    pub visible: bool,
}

impl<T> Default for PopupState<T> {
    fn default() -> Self {
        Self {
            current: None,
            visible: false,
        }
    }
}

struct SlotInner<T> {
    kind: PopupKind,
    tx: watch::Sender<PopupState<T>>,
    generation: AtomicU64,
    teardown: Duration,
}

impl<T> SlotInner<T> {
    fn teardown_if_unchanged(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(kind = ?self.kind, "Popup reopened before teardown, keeping content");
            return;
        }
        self.tx.send_if_modified(|state| {
            if state.visible || state.current.is_none() {
                return false;
            }
            state.current = None;
            true
        });
        debug!(kind = ?self.kind, "Popup content cleared");
    }
}

/// One popup slot.
pub struct PopupSlot<T> {
    inner: Arc<SlotInner<T>>,
}

impl<T> Clone for PopupSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for PopupSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupSlot")
            .field("kind", &self.inner.kind)
            .field("visible", &self.inner.tx.borrow().visible)
            .finish_non_exhaustive()
    }
}

impl<T> PopupSlot<T>
where
    T: Entity,
{
    #[must_use]
    pub fn new(kind: PopupKind, teardown: Duration) -> Self {
        let (tx, _) = watch::channel(PopupState::default());
        Self {
            inner: Arc::new(SlotInner {
                kind,
                tx,
                generation: AtomicU64::new(0),
                teardown,
            }),
        }
    }

    /// Show `entity`, replacing any current content.
    pub fn open(&self, entity: T) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        debug!(kind = ?self.inner.kind, id = entity.entity_id(), "Popup opened");
        self.inner.tx.send_modify(|state| {
            state.current = Some(entity);
            state.visible = true;
        });
    }

    /// Hide now; drop the content after the teardown delay.
    ///
    /// Outside a tokio runtime nothing can run the delayed teardown, so the
    /// hidden content stays until the next `open` replaces it.
    pub fn close(&self) {
        let generation = self.inner.generation.load(Ordering::SeqCst);
        self.inner.tx.send_if_modified(|state| {
            let changed = state.visible;
            state.visible = false;
            changed
        });
        debug!(kind = ?self.inner.kind, "Popup hidden");

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let weak: Weak<SlotInner<T>> = Arc::downgrade(&self.inner);
                let delay = self.inner.teardown;
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(inner) = weak.upgrade() {
                        inner.teardown_if_unchanged(generation);
                    }
                });
            }
            Err(_) => {
                debug!(kind = ?self.inner.kind, "No runtime for teardown; content kept hidden");
            }
        }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> PopupState<T> {
        self.inner.tx.borrow().clone()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.inner.tx.borrow().visible
    }

    /// Observe every change to this slot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PopupState<T>> {
        self.inner.tx.subscribe()
    }
}

/// Both popup slots, shared by every screen of one console.
#[derive(Debug, Clone)]
pub struct PopupCoordinator {
    products: PopupSlot<Product>,
    reviews: PopupSlot<Review>,
}

impl PopupCoordinator {
    #[must_use]
    pub fn new(teardown: Duration) -> Self {
        Self {
            products: PopupSlot::new(PopupKind::Product, teardown),
            reviews: PopupSlot::new(PopupKind::Review, teardown),
        }
    }

    #[must_use]
    pub const fn products(&self) -> &PopupSlot<Product> {
        &self.products
    }

    #[must_use]
    pub const fn reviews(&self) -> &PopupSlot<Review> {
        &self.reviews
    }

    pub fn open(&self, selection: PopupSelection) {
        match selection {
            PopupSelection::Product(product) => self.products.open(product),
            PopupSelection::Review(review) => self.reviews.open(review),
        }
    }

    pub fn close(&self, kind: PopupKind) {
        match kind {
            PopupKind::Product => self.products.close(),
            PopupKind::Review => self.reviews.close(),
        }
    }

    #[must_use]
    pub fn is_visible(&self, kind: PopupKind) -> bool {
        match kind {
            PopupKind::Product => self.products.is_visible(),
            PopupKind::Review => self.reviews.is_visible(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_admin_core::{ProductId, ReviewId};

    use super::*;

    const TEARDOWN: Duration = Duration::from_millis(300);

    fn product(id: &str) -> Product {
        Product {
            productid: ProductId::new(id),
            productname: format!("Product {id}"),
            ..Product::default()
        }
    }

    fn review(id: &str) -> Review {
        Review {
            reviewid: ReviewId::new(id),
            ..Review::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_notifies_observers_immediately() {
        let popups = PopupCoordinator::new(TEARDOWN);
        let mut rx = popups.products().subscribe();

        popups.open(PopupSelection::Product(product("p1")));

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert!(state.visible);
        assert_eq!(state.current.unwrap().productid.as_str(), "p1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_hides_then_clears_after_delay() {
        let popups = PopupCoordinator::new(TEARDOWN);
        popups.open(PopupSelection::Product(product("p1")));
        popups.close(PopupKind::Product);

        let state = popups.products().snapshot();
        assert!(!state.visible);
        assert!(state.current.is_some());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(popups.products().snapshot().current.is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(popups.products().snapshot().current.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_writer_wins() {
        let popups = PopupCoordinator::new(TEARDOWN);
        let screen_a = popups.products().subscribe();
        let screen_b = popups.products().subscribe();

        popups.open(PopupSelection::Product(product("from-a")));
        popups.open(PopupSelection::Product(product("from-b")));

        for rx in [screen_a, screen_b] {
            let state = rx.borrow().clone();
            assert_eq!(state.current.unwrap().productid.as_str(), "from-b");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_during_teardown_keeps_new_content() {
        let popups = PopupCoordinator::new(TEARDOWN);
        popups.open(PopupSelection::Product(product("p1")));
        popups.close(PopupKind::Product);

        tokio::time::sleep(Duration::from_millis(100)).await;
        popups.open(PopupSelection::Product(product("p2")));

        tokio::time::sleep(Duration::from_millis(400)).await;
        let state = popups.products().snapshot();
        assert!(state.visible);
        assert_eq!(state.current.unwrap().productid.as_str(), "p2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_are_independent() {
        let popups = PopupCoordinator::new(TEARDOWN);
        popups.open(PopupSelection::Product(product("p1")));
        popups.open(PopupSelection::Review(review("r1")));
        popups.close(PopupKind::Review);

        assert!(popups.is_visible(PopupKind::Product));
        assert!(!popups.is_visible(PopupKind::Review));
        assert_eq!(
            PopupSelection::Review(review("r2")).kind(),
            PopupKind::Review
        );
    }

    #[test]
    fn test_close_without_runtime_keeps_content_until_next_open() {
        let slot = PopupSlot::new(PopupKind::Review, TEARDOWN);
        slot.open(review("r1"));
        slot.close();

        let hidden = slot.snapshot();
        assert!(!hidden.visible);
        assert_eq!(hidden.current.unwrap().reviewid.as_str(), "r1");

        slot.open(review("r2"));
        let shown = slot.snapshot();
        assert!(shown.visible);
        assert_eq!(shown.current.unwrap().reviewid.as_str(), "r2");
    }
}
