//! REST backend client for the storefront.
//!
//! Plain JSON over `reqwest`. Catalog reads (products, categories) are cached
//! with `moka` for 5 minutes; placing an order always goes to the backend.

mod cache;

use std::sync::Arc;
use std::time::Duration;

use bazaar_core::{Category, NewOrder, Order, Product, ProductId};
use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::BackendConfig;

use cache::{CATEGORIES_KEY, CacheValue, PRODUCTS_KEY, product_key};

/// Errors that can occur when calling the REST backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

// =============================================================================
// StoreClient
// =============================================================================

/// Client for the storefront's slice of the REST backend.
///
/// Products and categories are cached for 5 minutes.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
    cache: Cache<String, CacheValue>,
}

impl StoreClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(StoreClientInner {
                client: reqwest::Client::builder().timeout(config.timeout).build()?,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                token: config.token.clone(),
                cache,
            }),
        })
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

    /// Send a request and decode the JSON body of a successful response.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        // Check for rate limiting
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
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.trim().chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// All products, in backend order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(PRODUCTS_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Arc<Vec<Product>> = Arc::new(
            self.execute(self.request(Method::GET, "/products"), "/products")
                .await?,
        );
        self.inner
            .cache
            .insert(
                PRODUCTS_KEY.to_string(),
                CacheValue::Products(Arc::clone(&products)),
            )
            .await;
        Ok(products)
    }

    /// One product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the backend has no such product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = product_key(id.as_str());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!(product_id = %id, "Cache hit for product");
            return Ok(*product);
        }

        let path = format!("/products/{}", urlencoding::encode(id.as_str()));
        let product: Product = self.execute(self.request(Method::GET, &path), &path).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Categories in display order (ascending `order`).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Arc<Vec<Category>>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(CATEGORIES_KEY).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let fetched: Vec<Category> = self
            .execute(self.request(Method::GET, "/categories"), "/categories")
            .await?;
        let categories = Arc::new(Category::sorted(fetched));
        self.inner
            .cache
            .insert(
                CATEGORIES_KEY.to_string(),
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;
        Ok(categories)
    }

    /// Submit an order and return the backend's record of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order or the request fails.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total_amount))]
    pub async fn place_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.execute(self.request(Method::POST, "/orders").json(order), "/orders")
            .await
    }

    /// Check that the backend answers `GET /categories`, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error when the backend is unreachable.
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.execute::<serde_json::Value>(self.request(Method::GET, "/categories"), "/categories")
            .await
            .map(drop)
    }
}
