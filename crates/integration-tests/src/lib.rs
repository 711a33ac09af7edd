//! End-to-end tests for the catalog admin console.
//!
//! Every test drives a real [`Console`] against an `httpmock` server that
//! plays the catalog backend, so the whole stack runs: configuration,
//! session gate, HTTP client, list controllers and screen services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-admin-integration-tests
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use httpmock::MockServer;
use serde_json::{Value, json};

use catalog_admin::session::{FileSessionStore, MemorySessionStore, SessionStore};
use catalog_admin::{Console, ConsoleConfig, ConsoleError};

/// A mocked backend plus the configuration pointing at it.
pub struct TestBackend {
    pub server: MockServer,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start_async().await,
        }
    }

    /// Configuration aimed at the mock server with small pages.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URL does not parse.
    #[must_use]
    #[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
    pub fn config(&self) -> ConsoleConfig {
        ConsoleConfig {
            api_url: self.server.url("/").parse().unwrap(),
            page_limit: 2,
            review_limit: 2,
            reviews_per_page: 2,
            popup_teardown: Duration::from_millis(300),
            ..ConsoleConfig::default()
        }
    }

    /// A console with in-memory session storage.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn console(&self) -> Result<Console, ConsoleError> {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        Console::with_store(self.config(), Some(store))
    }

    /// A console whose session marker lives in `path`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn console_with_file(&self, path: &Path) -> Result<Console, ConsoleError> {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(path));
        Console::with_store(self.config(), Some(store))
    }

    /// A console already signed in as `admin_id`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built or the marker
    /// cannot be stored.
    pub fn signed_in(&self, admin_id: &str) -> Result<Console, ConsoleError> {
        let console = self.console()?;
        console
            .gate()
            .sign_in(&catalog_admin_core::AdminId::new(admin_id))?;
        Ok(console)
    }
}

/// Product record as the admin feed returns it.
#[must_use]
pub fn product_json(id: &str, name: &str, owner: &str, status: i64) -> Value {
    json!({
        "productid": id,
        "productname": name,
        "userid": owner,
        "productcategory": "Vision",
        "producttechnology": "Transformers",
        "status": status,
        "rating": 4.5,
        "createddate": "2024-03-01"
    })
}

/// User record as `get_all_users` returns it.
#[must_use]
pub fn user_json(id: &str, name: &str, email: &str, status: &str) -> Value {
    json!({
        "id": id,
        "userid": id,
        "name": name,
        "email": email,
        "status": status,
        "createdDate": "2024-01-15"
    })
}

/// Review record as the review feeds return it.
#[must_use]
pub fn review_json(id: &str, productid: &str, userid: &str, rating: f64, comment: &str) -> Value {
    json!({
        "reviewid": id,
        "productid": productid,
        "userid": userid,
        "username": "Reviewer",
        "experiencerate": rating,
        "comment": comment,
        "createddate": "2024-04-02"
    })
}
