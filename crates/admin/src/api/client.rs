//! HTTP plumbing shared by all endpoint wrappers.

use std::sync::Arc;

use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};
use url::Url;

use super::ApiError;
use crate::config::ConsoleConfig;

/// Longest error body kept in [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Catalog backend API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from the console configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
            }),
        })
    }

    /// Create a client for an explicit base URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_base_url(base_url: Url) -> Result<Self, ApiError> {
        Self::new(&ConsoleConfig {
            api_url: base_url,
            ..ConsoleConfig::default()
        })
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn url(&self, endpoint: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(endpoint)?)
    }

    /// Execute a GET request.
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.url(endpoint)?;
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(endpoint, response).await
    }

    /// Execute a POST request with a JSON body.
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub(crate) async fn post_json<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let url = self.url(endpoint)?;
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::handle_response(endpoint, response).await
    }

    /// Execute a POST request with a multipart form body.
    #[instrument(skip(self, form), fields(endpoint = %endpoint))]
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint)?;
        let response = self.inner.client.post(url).multipart(form).send().await?;
        Self::handle_response(endpoint, response).await
    }

    /// Check the status and parse the JSON body.
    async fn handle_response<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            debug!(endpoint, bytes = bytes.len(), "Backend response received");
            return serde_json::from_slice(&bytes)
                .map_err(|e| ApiError::Parse(format!("{endpoint}: {e}")));
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        error!(endpoint, status = status.as_u16(), "Backend request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::api::types::MessageResponse;

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::with_base_url(Url::parse(&server.url("/")).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_get_parses_json() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/ping");
            then.status(200).json_body(json!({"message": "pong"}));
        });

        let response: MessageResponse = client_for(&server).get("ping").await.unwrap();
        assert_eq!(response.message, "pong");
        mock.assert();
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/delete_product");
            then.status(500).body("boom");
        });

        let result: Result<MessageResponse, _> = client_for(&server)
            .post_json("delete_product", &json!({"productid": "p1"}))
            .await;
        match result {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_parse_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/get_all_users");
            then.status(200).body("<html>");
        });

        let result: Result<MessageResponse, _> = client_for(&server).get("get_all_users").await;
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[tokio::test]
    async fn test_json_body_is_sent() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/get_all_product_details_all_admin")
                .json_body(json!({"page": 2, "limit": 10}));
            then.status(200).json_body(json!({"message": "ok"}));
        });

        let _: MessageResponse = client_for(&server)
            .post_json(
                "get_all_product_details_all_admin",
                &json!({"page": 2, "limit": 10}),
            )
            .await
            .unwrap();
        mock.assert();
    }
}
