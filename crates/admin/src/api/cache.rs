//! Cache types for REST backend responses.

use std::sync::Arc;

use bazaar_core::{Category, Order, UserProfile};

/// Group of cache entries invalidated together after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Categories,
    Orders,
    User,
}

/// Cache key for backend reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    Orders,
    /// User record by lowercased email.
    User(String),
}

impl CacheKey {
    #[must_use]
    pub const fn tag(&self) -> CacheTag {
        match self {
            Self::Categories => CacheTag::Categories,
            Self::Orders => CacheTag::Orders,
            Self::User(_) => CacheTag::User,
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Arc<Vec<Category>>),
    Orders(Arc<Vec<Order>>),
    User(Box<UserProfile>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_to_tags() {
        assert_eq!(CacheKey::Categories.tag(), CacheTag::Categories);
        assert_eq!(CacheKey::Orders.tag(), CacheTag::Orders);
        assert_eq!(CacheKey::User("a@b.c".to_string()).tag(), CacheTag::User);
    }
}
