//! Cache types for catalog lookups.

use std::sync::Arc;

use elegance_core::catalog::ProductQuery;
use elegance_core::{Category, Product, ProductId};

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products(ProductQuery),
    Similar(Category, ProductId),
    CategoryCounts,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
    CategoryCounts(Arc<Vec<(Category, usize)>>),
}
