//! Cache types for catalog API responses.

use std::sync::Arc;

use fakestore_core::{Category, Product};

/// Cache key for catalog listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products(Category),
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Categories(Arc<Vec<String>>),
}
