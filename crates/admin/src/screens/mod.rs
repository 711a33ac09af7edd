//! Console screens.
//!
//! Each screen holds the state a page of the console shows and exposes its
//! actions as methods. Screens never render; a front end reads their
//! snapshots and calls their actions.

mod drawer;
mod editor;
mod login;
mod products;
mod reviews;
mod taxonomy;
mod users;

pub use drawer::ReviewDrawer;
pub use editor::{EditorMode, PRODUCTS_ROUTE, ProductEditor};
pub use login::{LoginResult, LoginScreen};
pub use products::{AssignDialog, ProductsScreen};
pub use reviews::{ReviewsScreen, average_rating};
pub use taxonomy::TaxonomyScreen;
pub use users::{UserProducts, UsersScreen};

use std::sync::{Arc, Mutex, PoisonError};

/// A drawer slot holding at most one open drawer.
#[derive(Debug)]
pub(crate) struct DrawerSlot<D>(Mutex<Option<Arc<D>>>);

impl<D> Default for DrawerSlot<D> {
    fn default() -> Self {
        Self(Mutex::new(None))
    }
}

impl<D> DrawerSlot<D> {
    pub(crate) fn replace(&self, drawer: Arc<D>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(drawer);
    }

    pub(crate) fn current(&self) -> Option<Arc<D>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn close(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}
