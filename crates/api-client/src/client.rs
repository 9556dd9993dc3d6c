//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{PostsApi, UsersApi};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use feedlens_feed::{FeedSource, PostRecord, SourceError, UserId, UserRecord};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Feed API client
///
/// Wraps `reqwest` with a per-request timeout and a correlation ID on every
/// request. Failures are returned as-is; there is no retry.
#[derive(Clone)]
pub struct FeedClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FeedClient {
    /// Create a new client with configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("feedlens/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Access post endpoints
    #[must_use]
    pub fn posts(&self) -> PostsApi {
        PostsApi::new(self.clone())
    }

    /// Access user endpoints
    #[must_use]
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Absolute URL for `path` under the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET `path` and parse the body as JSON
    #[instrument(skip(self), fields(request_id))]
    pub async fn get_json(&self, path: &str) -> ApiResult<Value> {
        let url = self.url(path);
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let response = self
            .inner
            .get(&url)
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await?;
        let value = self.handle_response(response).await;

        debug!(
            url = %url,
            elapsed_ms = start.elapsed().as_millis(),
            ok = value.is_ok(),
            "Request finished"
        );
        value
    }

    /// GET `path` and require a JSON array body
    pub async fn get_array(&self, path: &str) -> ApiResult<Vec<Value>> {
        expect_array(self.get_json(path).await?)
    }

    /// Handle HTTP response and parse JSON
    async fn handle_response(&self, response: Response) -> ApiResult<Value> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}

pub(crate) fn expect_array(value: Value) -> ApiResult<Vec<Value>> {
    match value {
        Value::Array(values) => Ok(values),
        other => Err(ApiError::UnexpectedShape(format!(
            "expected a JSON array, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        Ok(self.posts().list().await?)
    }

    async fn fetch_all_users(&self) -> Result<Vec<UserRecord>, SourceError> {
        Ok(self.users().list().await?)
    }

    async fn fetch_posts_by_user(&self, user_id: UserId) -> Result<Vec<PostRecord>, SourceError> {
        Ok(self.posts().by_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_client_creation() {
        let client = FeedClient::with_config(ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::default().with_base_url("localhost:3000");
        assert!(matches!(
            FeedClient::with_config(config),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_url_joining() {
        let config = ClientConfig::default().with_base_url("http://localhost:3000/api/");
        let client = FeedClient::with_config(config).unwrap();
        assert_eq!(client.url("posts"), "http://localhost:3000/api/posts");
        assert_eq!(client.url("/users"), "http://localhost:3000/api/users");
    }

    #[test]
    fn test_expect_array() {
        assert_eq!(expect_array(json!([1, 2])).unwrap().len(), 2);

        let err = expect_array(json!({"id": 1})).unwrap_err();
        assert!(err.to_string().contains("an object"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let client = FeedClient::with_config(config).unwrap();

        let err = client.fetch_all_users().await.unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
    }
}
