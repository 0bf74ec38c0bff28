//! Cache types for catalog reads.

use std::sync::Arc;

use bazaar_core::{Category, Product};

/// Cached value types.
///
/// Keys are plain strings: `products`, `categories`, `product:{id}`.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Box<Product>),
    Categories(Arc<Vec<Category>>),
}

pub const PRODUCTS_KEY: &str = "products";
pub const CATEGORIES_KEY: &str = "categories";

/// Cache key for a single product.
#[must_use]
pub fn product_key(id: &str) -> String {
    format!("product:{id}")
}
