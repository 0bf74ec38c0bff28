//! HTTP plumbing shared by every backend operation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheTag, CacheValue};
use super::{ApiError, MAX_ERROR_BODY_CHARS, extract_error_message};
use crate::config::ApiConfig;

/// Client for the Bazaar REST backend.
///
/// Cheap to clone; clones share the connection pool and the response cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .support_invalidation_closures()
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                token: config.token.clone(),
                cache,
            }),
        })
    }

    /// Backend base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url));
        match &self.inner.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and return the body of a successful response.
    async fn execute(&self, builder: RequestBuilder, path: &str) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        debug!(status = %status, path = %path, "Backend request succeeded");
        Ok(body)
    }

    fn parse<T: DeserializeOwned>(body: &str, path: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                body = %body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    pub(super) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(self.request(Method::GET, path), path).await?;
        Self::parse(&body, path)
    }

    pub(super) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(self.request(method, path).json(payload), path)
            .await?;
        Self::parse(&body, path)
    }

    /// Send a mutation whose response body is ignored (any 2xx is success).
    pub(super) async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
    ) -> Result<(), ApiError> {
        self.execute(self.request(method, path).json(payload), path)
            .await
            .map(drop)
    }

    pub(super) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, path), path)
            .await
            .map(drop)
    }

    pub(super) async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }

    pub(super) async fn store(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    /// Drop every cached read carrying `tag`.
    pub fn invalidate(&self, tag: CacheTag) {
        if let Err(e) = self
            .inner
            .cache
            .invalidate_entries_if(move |key, _| key.tag() == tag)
        {
            tracing::warn!(error = %e, ?tag, "Tag invalidation unavailable, clearing cache");
            self.inner.cache.invalidate_all();
        }
    }

    /// Check that the backend answers `GET /categories`, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error when the backend is unreachable.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.execute(self.request(Method::GET, "/categories"), "/categories")
            .await
            .map(drop)
    }
}

/// Percent-encode a value for use as a single path segment.
pub(super) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment("Men's Shoes"), "Men%27s%20Shoes");
        assert_eq!(segment("a/b"), "a%2Fb");
        assert_eq!(segment("ops+1@bazaar.test"), "ops%2B1%40bazaar.test");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new(&ApiConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
