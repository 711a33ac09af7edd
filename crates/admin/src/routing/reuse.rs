//! Screen instance reuse across navigations.
//!
//! When a reusable screen is left its instance is stored under a route key;
//! when a navigation enters a route with a stored instance, that instance is
//! handed back instead of building a fresh one. Stored state is never
//! invalidated except by leaving for a different key, so a reattached list
//! shows whatever it held when it was detached.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::RouteMatch;

/// How route identity is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReuseKeyMode {
    /// Path template only; `/update-product/a/b` and `/update-product/c/d`
    /// share one instance.
    #[default]
    Template,
    /// Template plus parameter values.
    TemplateWithParams,
}

/// Stable identity of a route for reuse purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReuseKey(String);

impl ReuseKey {
    #[must_use]
    pub fn for_route(route: &RouteMatch, mode: ReuseKeyMode) -> Self {
        let template = route.screen.template();
        match mode {
            ReuseKeyMode::Template => Self(template.to_string()),
            ReuseKeyMode::TemplateWithParams if route.params.is_empty() => {
                Self(template.to_string())
            }
            ReuseKeyMode::TemplateWithParams => {
                let params: Vec<String> = route
                    .params
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                Self(format!("{template}?{}", params.join("&")))
            }
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReuseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decides whether screen instances are kept and handed back.
///
/// `H` is whatever handle the caller uses for a built screen.
pub struct RouteReuseAdvisor<H> {
    mode: ReuseKeyMode,
    stored: HashMap<ReuseKey, H>,
}

impl<H> fmt::Debug for RouteReuseAdvisor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteReuseAdvisor")
            .field("mode", &self.mode)
            .field("stored", &self.stored.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<H> Default for RouteReuseAdvisor<H> {
    fn default() -> Self {
        Self::new(ReuseKeyMode::default())
    }
}

impl<H> RouteReuseAdvisor<H> {
    #[must_use]
    pub fn new(mode: ReuseKeyMode) -> Self {
        Self {
            mode,
            stored: HashMap::new(),
        }
    }

    #[must_use]
    pub fn key(&self, route: &RouteMatch) -> ReuseKey {
        ReuseKey::for_route(route, self.mode)
    }

    /// Whether the instance of a route being left should be kept.
    #[must_use]
    pub const fn should_detach(&self, route: &RouteMatch) -> bool {
        route.screen.is_reusable()
    }

    /// Keep the instance of a route being left. Returns the instance it
    /// displaced, or the given handle back when the route is not reusable.
    pub fn store(&mut self, route: &RouteMatch, handle: H) -> Option<H> {
        if !self.should_detach(route) {
            return Some(handle);
        }
        let key = self.key(route);
        debug!(key = %key, "Storing screen instance");
        self.stored.insert(key, handle)
    }

    /// Whether entering `route` can reuse a stored instance.
    #[must_use]
    pub fn should_attach(&self, route: &RouteMatch) -> bool {
        self.stored.contains_key(&self.key(route))
    }

    /// Take the stored instance for `route`.
    pub fn retrieve(&mut self, route: &RouteMatch) -> Option<H> {
        let key = self.key(route);
        let handle = self.stored.remove(&key);
        if handle.is_some() {
            debug!(key = %key, "Reattaching screen instance");
        }
        handle
    }

    /// Whether a navigation from `current` to `future` keeps the current
    /// instance in place.
    #[must_use]
    pub fn should_reuse_route(&self, future: &RouteMatch, current: &RouteMatch) -> bool {
        self.key(future) == self.key(current)
    }

    /// Drop every stored instance.
    pub fn clear(&mut self) {
        self.stored.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stored.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }
}
