use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::reuse::{ReuseKeyMode, RouteReuseAdvisor};
use super::{Resolution, RouteMatch, Screen, resolve};
use crate::session::{GateDecision, SessionGate};

const MAX_REDIRECTS: usize = 4;

/// Result of one navigation.
#[derive(Debug)]
pub struct Navigation<H> {
    /// Route that ends up displayed.
    pub route: RouteMatch,
    /// Whether the requested path was redirected.
    pub redirected: bool,
    /// Instance to display; `None` means build a fresh one.
    pub instance: Option<H>,
}

/// Applies redirects, the session gate and instance reuse to navigations.
pub struct Navigator<H> {
    gate: Arc<SessionGate>,
    advisor: RouteReuseAdvisor<H>,
    current: Option<RouteMatch>,
}

impl<H> std::fmt::Debug for Navigator<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("current", &self.current.as_ref().map(|r| &r.path))
            .field("advisor", &self.advisor)
            .finish_non_exhaustive()
    }
}

impl<H> Navigator<H> {
    #[must_use]
    pub fn new(gate: Arc<SessionGate>, mode: ReuseKeyMode) -> Self {
        Self {
            gate,
            advisor: RouteReuseAdvisor::new(mode),
            current: None,
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<&RouteMatch> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn advisor(&self) -> &RouteReuseAdvisor<H> {
        &self.advisor
    }

    /// Resolve `path` through redirects and the gate.
    fn settle(&self, path: &str) -> (RouteMatch, bool) {
        let mut target = path.to_string();
        let mut redirected = false;
        for _ in 0..MAX_REDIRECTS {
            match resolve(&target) {
                Resolution::Redirect(to) => {
                    debug!(from = %target, to, "Redirecting");
                    target = to.to_string();
                    redirected = true;
                }
                Resolution::Screen(route) if route.screen.is_protected() => {
                    match self.gate.check() {
                        GateDecision::Allow => return (route, redirected),
                        GateDecision::Redirect(to) => {
                            debug!(path = %route.path, to, "Session gate refused navigation");
                            target = to.to_string();
                            redirected = true;
                        }
                    }
                }
                Resolution::Screen(route) => return (route, redirected),
            }
        }
        warn!(path, last = %target, "Too many redirects");
        (redirect_loop_fallback(), true)
    }

    /// Navigate to `path`, offering the instance of the screen being left.
    ///
    /// A reusable outgoing instance is stored; anything else is dropped.
    /// When the target keeps the current route identity the outgoing
    /// instance is returned as-is.
    pub fn navigate(&mut self, path: &str, outgoing: Option<H>) -> Navigation<H> {
        let (route, redirected) = self.settle(path);

        let same_route = self
            .current
            .as_ref()
            .is_some_and(|current| self.advisor.should_reuse_route(&route, current));
        if same_route {
            self.current = Some(route.clone());
            return Navigation {
                route,
                redirected,
                instance: outgoing,
            };
        }

        if let (Some(current), Some(handle)) = (&self.current, outgoing) {
            let current = current.clone();
            drop(self.advisor.store(&current, handle));
        }

        let instance = if self.advisor.should_attach(&route) {
            self.advisor.retrieve(&route)
        } else {
            None
        };
        self.current = Some(route.clone());
        Navigation {
            route,
            redirected,
            instance,
        }
    }

    /// Forget every stored instance, e.g. after logout.
    pub fn reset(&mut self) {
        self.advisor.clear();
        self.current = None;
    }
}

/// Where a navigation that keeps redirecting ends up.
fn redirect_loop_fallback() -> RouteMatch {
    RouteMatch {
        screen: Screen::PageNotFound,
        path: Screen::PageNotFound.template().to_string(),
        params: BTreeMap::new(),
    }
}
