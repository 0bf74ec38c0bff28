//! Integration tests for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! Every test starts its own [`backend::FakeBackend`] and a real admin or
//! storefront router on ephemeral ports, then drives it over HTTP with a
//! cookie-keeping client. Nothing outside the process is needed.
//!
//! # Test Files
//!
//! - `admin_categories` - Category tree editor
//! - `admin_orders` - Order console filters, status changes, export, delete
//! - `admin_profile` - Profile editor payloads
//! - `storefront_checkout` - Catalog, cart and checkout

pub mod backend;
pub mod fixtures;
pub mod harness;

pub use backend::{BackendData, FakeBackend, RecordedRequest};
pub use harness::TestContext;
