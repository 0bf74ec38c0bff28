//! Session-related types.
//!
//! The storefront has no accounts; the session carries the cart and a
//! one-shot flash message.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// One-shot message rendered on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub message: String,
    pub is_error: bool,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }

    /// Store for the next render, logging instead of failing the request.
    pub async fn set(self, session: &Session) {
        if let Err(e) = session.insert(keys::FLASH, self).await {
            tracing::error!("Failed to store flash message: {e}");
        }
    }

    /// Remove and return the pending message.
    pub async fn take(session: &Session) -> Option<Self> {
        session.remove::<Self>(keys::FLASH).await.ok().flatten()
    }
}

/// Session keys.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = "cart";

    /// Key for the pending flash message.
    pub const FLASH: &str = "flash";

    /// Id of the last order placed in this session, for the confirmation page.
    pub const LAST_ORDER: &str = "last_order";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn test_flash_is_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        Flash::error("Your cart is empty").set(&session).await;

        let flash = Flash::take(&session).await.unwrap();
        assert!(flash.is_error);
        assert_eq!(flash.message, "Your cart is empty");
        assert_eq!(Flash::take(&session).await, None);
    }
}
