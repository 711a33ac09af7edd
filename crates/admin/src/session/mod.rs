//! Session gate for protected screens.
//!
//! The only authentication signal is the `adminid` marker in session
//! storage. A successful login writes it; every protected navigation reads
//! it. There is no expiry, refresh or revocation: the marker lives until
//! logout clears the store or the session itself ends.

mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, info, warn};

use catalog_admin_core::AdminId;

use crate::routing::LOGIN_ROUTE;

/// Storage key of the session marker.
pub const ADMIN_ID_KEY: &str = "adminid";

/// Errors raised by session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Corrupt(String),

    #[error("No session storage available")]
    Unavailable,
}

/// Gate behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionGateConfig {
    /// Allow protected routes when there is no session storage at all
    /// (non-interactive contexts such as pre-rendering). This is a
    /// convenience, not a security boundary.
    pub fail_open_without_storage: bool,
}

impl Default for SessionGateConfig {
    fn default() -> Self {
        Self {
            fail_open_without_storage: true,
        }
    }
}

/// Authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated { admin_id: AdminId },
}

impl AuthState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Result of a protected-navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

/// Reads and writes the session marker and guards protected navigation.
pub struct SessionGate {
    store: Option<Arc<dyn SessionStore>>,
    config: SessionGateConfig,
    state: RwLock<AuthState>,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("has_storage", &self.store.is_some())
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

impl SessionGate {
    /// Gate backed by `store`. The initial state reflects a marker already present.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, config: SessionGateConfig) -> Self {
        let gate = Self {
            store: Some(store),
            config,
            state: RwLock::new(AuthState::Unauthenticated),
        };
        gate.check();
        gate
    }

    /// Gate for a context with no session storage.
    #[must_use]
    pub fn without_storage(config: SessionGateConfig) -> Self {
        Self {
            store: None,
            config,
            state: RwLock::new(AuthState::Unauthenticated),
        }
    }

    #[must_use]
    pub const fn has_storage(&self) -> bool {
        self.store.is_some()
    }

    /// Current state as of the last check, sign-in or sign-out.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_state(&self, state: AuthState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// The stored marker, if any. Read failures count as no marker.
    #[must_use]
    pub fn admin_id(&self) -> Option<AdminId> {
        let store = self.store.as_ref()?;
        match store.get(ADMIN_ID_KEY) {
            Ok(value) => value.filter(|v| !v.is_empty()).map(AdminId::new),
            Err(e) => {
                warn!(error = %e, "Failed to read session marker");
                None
            }
        }
    }

    /// Write the marker after a successful login.
    ///
    /// # Errors
    ///
    /// Returns error when there is no storage or the write fails.
    pub fn sign_in(&self, admin_id: &AdminId) -> Result<(), SessionError> {
        let store = self.store.as_ref().ok_or(SessionError::Unavailable)?;
        store.set(ADMIN_ID_KEY, admin_id.as_str())?;
        self.set_state(AuthState::Authenticated {
            admin_id: admin_id.clone(),
        });
        info!(admin_id = %admin_id, "Session started");
        Ok(())
    }

    /// Clear the whole session store.
    ///
    /// # Errors
    ///
    /// Returns error when clearing the storage fails; the in-memory state is
    /// reset regardless.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.set_state(AuthState::Unauthenticated);
        if let Some(store) = &self.store {
            store.clear()?;
        }
        info!("Session cleared");
        Ok(())
    }

    /// Decide a protected navigation.
    ///
    /// Marker present: allow and stay authenticated. Marker absent: deny,
    /// drop to unauthenticated and redirect to the login entry point. No
    /// storage: allow only when `fail_open_without_storage` is set.
    pub fn check(&self) -> GateDecision {
        if self.store.is_none() {
            return if self.config.fail_open_without_storage {
                debug!("No session storage, failing open");
                GateDecision::Allow
            } else {
                debug!("No session storage, denying");
                GateDecision::Redirect(LOGIN_ROUTE)
            };
        }

        match self.admin_id() {
            Some(admin_id) => {
                self.set_state(AuthState::Authenticated { admin_id });
                GateDecision::Allow
            }
            None => {
                self.set_state(AuthState::Unauthenticated);
                debug!("No session marker, redirecting to login");
                GateDecision::Redirect(LOGIN_ROUTE)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gate() -> (Arc<MemorySessionStore>, SessionGate) {
        let store = Arc::new(MemorySessionStore::new());
        let gate = SessionGate::new(store.clone(), SessionGateConfig::default());
        (store, gate)
    }

    #[test]
    fn test_marker_absent_redirects() {
        let (_, gate) = gate();
        assert_eq!(gate.check(), GateDecision::Redirect("/auth/log-in"));
        assert_eq!(gate.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_sign_in_then_check() {
        let (store, gate) = gate();
        gate.sign_in(&AdminId::new("42")).unwrap();
        assert_eq!(store.get(ADMIN_ID_KEY).unwrap().as_deref(), Some("42"));
        assert_eq!(gate.check(), GateDecision::Allow);
        assert_eq!(
            gate.state(),
            AuthState::Authenticated {
                admin_id: AdminId::new("42")
            }
        );
    }

    #[test]
    fn test_marker_removed_externally_forces_unauthenticated() {
        let (store, gate) = gate();
        gate.sign_in(&AdminId::new("42")).unwrap();
        store.remove(ADMIN_ID_KEY).unwrap();
        assert_eq!(gate.check(), GateDecision::Redirect(LOGIN_ROUTE));
        assert!(!gate.state().is_authenticated());
    }

    #[test]
    fn test_existing_marker_authenticates_on_construction() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(ADMIN_ID_KEY, "7").unwrap();
        let gate = SessionGate::new(store, SessionGateConfig::default());
        assert!(gate.state().is_authenticated());
    }

    #[test]
    fn test_sign_out_clears_store() {
        let (store, gate) = gate();
        store.set("theme", "dark").unwrap();
        gate.sign_in(&AdminId::new("42")).unwrap();
        gate.sign_out().unwrap();
        assert!(store.get("theme").unwrap().is_none());
        assert!(gate.admin_id().is_none());
        assert_eq!(gate.check(), GateDecision::Redirect(LOGIN_ROUTE));
    }

    #[test]
    fn test_no_storage_fails_open_only_when_configured() {
        let open = SessionGate::without_storage(SessionGateConfig::default());
        assert_eq!(open.check(), GateDecision::Allow);
        assert!(matches!(
            open.sign_in(&AdminId::new("1")),
            Err(SessionError::Unavailable)
        ));

        let closed = SessionGate::without_storage(SessionGateConfig {
            fail_open_without_storage: false,
        });
        assert_eq!(closed.check(), GateDecision::Redirect(LOGIN_ROUTE));
    }
}
