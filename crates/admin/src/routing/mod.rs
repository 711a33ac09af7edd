//! Console route table.
//!
//! Paths are matched without leading or trailing slashes; query strings and
//! fragments are ignored. Protected screens live under `home/` and pass
//! through the [`SessionGate`](crate::session::SessionGate) before they
//! resolve.

mod navigator;
pub mod reuse;

pub use navigator::{Navigation, Navigator};
pub use reuse::{ReuseKey, ReuseKeyMode, RouteReuseAdvisor};

use std::collections::BTreeMap;

/// Login entry point.
pub const LOGIN_ROUTE: &str = "/auth/log-in";

/// Target of unknown paths.
pub const NOT_FOUND_ROUTE: &str = "/auth/page-not-found";

/// Where a successful login lands.
pub const LANDING_ROUTE: &str = "/home/dashboard";

/// Every screen of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Screen {
    LogIn,
    PageNotFound,
    Dashboard,
    UseCases,
    Technologies,
    Categories,
    Users,
    ProductsAll,
    ReviewsAll,
    AddProduct,
    UpdateProduct,
}

impl Screen {
    pub const ALL: [Self; 11] = [
        Self::LogIn,
        Self::PageNotFound,
        Self::Dashboard,
        Self::UseCases,
        Self::Technologies,
        Self::Categories,
        Self::Users,
        Self::ProductsAll,
        Self::ReviewsAll,
        Self::AddProduct,
        Self::UpdateProduct,
    ];

    /// Path template; `:name` segments capture parameters.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::LogIn => "auth/log-in",
            Self::PageNotFound => "auth/page-not-found",
            Self::Dashboard => "home/dashboard",
            Self::UseCases => "home/use-case",
            Self::Technologies => "home/technology",
            Self::Categories => "home/category",
            Self::Users => "home/users",
            Self::ProductsAll => "home/products-all",
            Self::ReviewsAll => "home/reviews-all",
            Self::AddProduct => "home/add-new-product",
            Self::UpdateProduct => "home/update-product/:productid/:userid",
        }
    }

    /// Whether the screen needs a session.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::LogIn | Self::PageNotFound)
    }

    /// Whether the screen keeps its instance across navigations.
    ///
    /// Only the long lists qualify: rebuilding them would drop every
    /// page loaded so far.
    #[must_use]
    pub const fn is_reusable(self) -> bool {
        matches!(self, Self::Users | Self::ProductsAll | Self::ReviewsAll)
    }
}

/// A path matched to a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub screen: Screen,
    /// Normalized path, without leading slash.
    pub path: String,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Outcome of resolving a path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Screen(RouteMatch),
    Redirect(&'static str),
}

/// Strip query, fragment and surrounding slashes.
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path.get(..end).unwrap_or(path).trim_matches('/')
}

fn match_template(template: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    let mut expected = template.split('/');
    let mut actual = path.split('/');
    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return Some(params),
            (Some(t), Some(a)) if t.starts_with(':') => {
                if a.is_empty() {
                    return None;
                }
                params.insert(t.trim_start_matches(':').to_string(), a.to_string());
            }
            (Some(t), Some(a)) if t == a => {}
            _ => return None,
        }
    }
}

/// Resolve a path.
///
/// The empty path redirects to the login entry point, bare `home` shows the
/// dashboard, and anything unknown redirects to the not-found page.
#[must_use]
pub fn resolve(path: &str) -> Resolution {
    let path = normalize(path);
    if path.is_empty() {
        return Resolution::Redirect(LOGIN_ROUTE);
    }
    if path == "home" {
        return Resolution::Screen(RouteMatch {
            screen: Screen::Dashboard,
            path: path.to_string(),
            params: BTreeMap::new(),
        });
    }
    Screen::ALL
        .iter()
        .find_map(|screen| {
            match_template(screen.template(), path).map(|params| RouteMatch {
                screen: *screen,
                path: path.to_string(),
                params,
            })
        })
        .map_or(Resolution::Redirect(NOT_FOUND_ROUTE), Resolution::Screen)
}

/// Path of the product editor for an existing product.
#[must_use]
pub fn update_product_path(productid: &str, userid: &str) -> String {
    format!("/home/update-product/{productid}/{userid}")
}

/// Side-menu highlight: `route` is active when `current` equals it or is
/// nested below it.
#[must_use]
pub fn is_active(current: &str, route: &str) -> bool {
    let current = normalize(current);
    let route = normalize(route);
    current == route
        || current
            .strip_prefix(route)
            .is_some_and(|rest| rest.starts_with('/'))
}
