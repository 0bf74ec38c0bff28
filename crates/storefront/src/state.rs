//! Application state shared across handlers.

use std::sync::Arc;

use bazaar_core::{CurrencyCode, Money};
use rust_decimal::Decimal;

use crate::api::{ApiError, StoreClient};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: StoreClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = StoreClient::new(&config.backend)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the REST backend client.
    #[must_use]
    pub fn api(&self) -> &StoreClient {
        &self.inner.api
    }

    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.inner.config.currency
    }

    /// Format `amount` in the store currency, e.g. `৳1,250.00`.
    #[must_use]
    pub fn price(&self, amount: Decimal) -> String {
        Money::new(amount, self.currency()).to_string()
    }
}
