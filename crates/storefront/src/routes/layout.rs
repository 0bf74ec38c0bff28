//! Data every storefront page passes to `base.html`.

use tower_sessions::Session;

use crate::models::{Cart, Flash};

/// Header badge, flash message and active nav entry.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub cart_count: u32,
    pub flash: Option<Flash>,
    pub current_path: String,
}

impl Layout {
    /// Read the cart badge and consume the pending flash.
    ///
    /// A session that cannot be read renders as an empty cart.
    pub async fn load(session: &Session, current_path: &str) -> Self {
        let cart_count = match Cart::load(session).await {
            Ok(cart) => cart.item_count(),
            Err(e) => {
                tracing::warn!("Failed to read cart from session: {e}");
                0
            }
        };

        Self {
            cart_count,
            flash: Flash::take(session).await,
            current_path: current_path.to_string(),
        }
    }

    /// Whether the nav link for `prefix` should be highlighted.
    #[must_use]
    pub fn is_active(&self, prefix: &str) -> bool {
        if prefix == "/" {
            self.current_path == "/"
        } else {
            self.current_path.starts_with(prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_is_only_active_on_root() {
        let layout = Layout {
            current_path: "/products".to_string(),
            ..Layout::default()
        };
        assert!(layout.is_active("/products"));
        assert!(!layout.is_active("/"));
    }
}
