//! Shared console context.
//!
//! One `Console` is built per run and cloned into every screen. Clones share
//! the API client, the session gate and the popup coordinator.

use std::sync::Arc;

use tracing::info;

use catalog_admin_core::{AdminId, UserId};

use crate::api::ApiClient;
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::list::ListOptions;
use crate::popup::{PopupCoordinator, PopupKind};
use crate::routing::{LOGIN_ROUTE, Navigator, ReuseKeyMode, RouteMatch, Screen};
use crate::session::{FileSessionStore, MemorySessionStore, SessionGate, SessionStore};

/// Console context shared by all screens.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    api: ApiClient,
    gate: Arc<SessionGate>,
    popups: PopupCoordinator,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("api", &self.inner.api)
            .field("gate", &self.inner.gate)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Build a console from configuration.
    ///
    /// The session marker lives in `session_file` when one is configured,
    /// otherwise in memory for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let store: Arc<dyn SessionStore> = match &config.session_file {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(MemorySessionStore::new()),
        };
        Self::with_store(config, Some(store))
    }

    /// Build a console with an explicit session store; `None` means no storage.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn with_store(
        config: ConsoleConfig,
        store: Option<Arc<dyn SessionStore>>,
    ) -> Result<Self, ConsoleError> {
        let api = ApiClient::new(&config)?;
        let gate = match store {
            Some(store) => SessionGate::new(store, config.session),
            None => SessionGate::without_storage(config.session),
        };
        let popups = PopupCoordinator::new(config.popup_teardown);
        info!(api_url = %config.api_url, "Console ready");
        Ok(Self {
            inner: Arc::new(ConsoleInner {
                config,
                api,
                gate: Arc::new(gate),
                popups,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn gate(&self) -> &Arc<SessionGate> {
        &self.inner.gate
    }

    #[must_use]
    pub fn popups(&self) -> &PopupCoordinator {
        &self.inner.popups
    }

    /// Options for the product, user and taxonomy lists.
    #[must_use]
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            page_size: self.inner.config.page_limit,
            dedupe_ids: self.inner.config.dedupe_ids,
        }
    }

    /// Options for review drawers.
    #[must_use]
    pub fn review_options(&self) -> ListOptions {
        ListOptions {
            page_size: self.inner.config.review_limit,
            dedupe_ids: self.inner.config.dedupe_ids,
        }
    }

    /// A fresh navigator bound to this console's session gate.
    #[must_use]
    pub fn navigator<H>(&self) -> Navigator<H> {
        Navigator::new(Arc::clone(&self.inner.gate), ReuseKeyMode::default())
    }

    /// Resolve `path` through the router and the session gate.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when the gate sends the caller to the login
    /// screen, or `NotAllowed` when the path does not name a screen.
    pub fn enter(&self, path: &str) -> Result<RouteMatch, ConsoleError> {
        let navigation = self.navigator::<()>().navigate(path, None);
        let route = navigation.route;
        if navigation.redirected && route.screen == Screen::LogIn {
            return Err(ConsoleError::Unauthenticated);
        }
        if route.screen == Screen::PageNotFound {
            return Err(ConsoleError::NotAllowed(format!("No screen at {path}")));
        }
        Ok(route)
    }

    /// The signed-in admin's id.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when no marker is stored.
    pub fn admin_id(&self) -> Result<AdminId, ConsoleError> {
        self.inner
            .gate
            .admin_id()
            .ok_or(ConsoleError::Unauthenticated)
    }

    /// The signed-in admin as a product owner.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when no marker is stored.
    pub fn owner_id(&self) -> Result<UserId, ConsoleError> {
        self.admin_id().map(|id| UserId::new(id.into_inner()))
    }

    /// Clear the session and dismiss any open popup; returns the login route.
    ///
    /// # Errors
    ///
    /// Returns error when the session store cannot be cleared.
    pub fn logout(&self) -> Result<&'static str, ConsoleError> {
        self.inner.popups.close(PopupKind::Product);
        self.inner.popups.close(PopupKind::Review);
        self.inner.gate.sign_out()?;
        Ok(LOGIN_ROUTE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::SessionGateConfig;

    fn console(store: Option<Arc<dyn SessionStore>>, fail_open: bool) -> Console {
        let config = ConsoleConfig {
            session: SessionGateConfig {
                fail_open_without_storage: fail_open,
            },
            ..ConsoleConfig::default()
        };
        Console::with_store(config, store).unwrap()
    }

    #[test]
    fn test_enter_requires_marker() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let console = console(Some(Arc::clone(&store)), true);

        assert!(matches!(
            console.enter("/home/users"),
            Err(ConsoleError::Unauthenticated)
        ));

        store.set("adminid", "42").unwrap();
        let route = console.enter("/home/users").unwrap();
        assert_eq!(route.screen, Screen::Users);
        assert_eq!(console.admin_id().unwrap().as_str(), "42");
        assert_eq!(console.owner_id().unwrap().as_str(), "42");
    }

    #[test]
    fn test_enter_unknown_path() {
        let console = console(None, true);
        assert!(matches!(
            console.enter("/nowhere"),
            Err(ConsoleError::NotAllowed(_))
        ));
    }

    #[test]
    fn test_enter_without_storage_follows_config() {
        assert!(console(None, true).enter("/home/dashboard").is_ok());
        assert!(matches!(
            console(None, false).enter("/home/dashboard"),
            Err(ConsoleError::Unauthenticated)
        ));
    }

    #[test]
    fn test_logout_clears_marker() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        store.set("adminid", "7").unwrap();
        let console = console(Some(store), true);

        assert_eq!(console.logout().unwrap(), LOGIN_ROUTE);
        assert!(matches!(
            console.admin_id(),
            Err(ConsoleError::Unauthenticated)
        ));
    }
}
