//! Catalog provider.
//!
//! Supplies read-only product records to the pages, the JSON API and the
//! cart. Two backends share one query model ([`ProductQuery`]):
//!
//! - **Sample**: the bundled products in `seed/products.yaml`, evaluated in
//!   memory.
//! - **Postgres**: the `products` table. Lookups are cached with `moka`
//!   (5-minute TTL by default).

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use elegance_core::catalog::{CatalogDataError, Facet, InMemoryCatalog, ProductQuery};
use elegance_core::{Category, Product, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use cache::{CacheKey, CacheValue};

/// The bundled sample catalog.
pub const SAMPLE_PRODUCTS_YAML: &str = include_str!("../../seed/products.yaml");

/// Errors from catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Database lookup failed.
    #[error("catalog database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Product records failed validation.
    #[error("invalid catalog data: {0}")]
    Data(#[from] CatalogDataError),

    /// A product file could not be parsed.
    #[error("invalid product file: {0}")]
    Format(#[from] serde_yaml::Error),
}

/// Parse and validate a YAML list of products.
///
/// # Errors
///
/// Returns `CatalogError::Format` for malformed YAML and `CatalogError::Data`
/// for invalid or duplicate records.
pub fn load_products(yaml: &str) -> Result<InMemoryCatalog, CatalogError> {
    let products: Vec<Product> = serde_yaml::from_str(yaml)?;
    Ok(InMemoryCatalog::new(products)?)
}

/// Read-only product source shared across handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<Backend>,
}

enum Backend {
    Sample(InMemoryCatalog),
    Postgres {
        pool: PgPool,
        cache: Cache<CacheKey, CacheValue>,
    },
}

impl Catalog {
    /// Catalog over the bundled sample products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled file is invalid.
    pub fn sample() -> Result<Self, CatalogError> {
        load_products(SAMPLE_PRODUCTS_YAML).map(Self::in_memory)
    }

    /// Catalog over an already validated set of records.
    #[must_use]
    pub fn in_memory(catalog: InMemoryCatalog) -> Self {
        Self {
            inner: Arc::new(Backend::Sample(catalog)),
        }
    }

    /// Catalog backed by the `products` table.
    #[must_use]
    pub fn postgres(pool: PgPool, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        Self {
            inner: Arc::new(Backend::Postgres { pool, cache }),
        }
    }

    /// Backend name for logs.
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        match *self.inner {
            Backend::Sample(_) => "sample",
            Backend::Postgres { .. } => "postgres",
        }
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database lookup fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        match &*self.inner {
            Backend::Sample(catalog) => Ok(catalog.product_by_id(id).cloned()),
            Backend::Postgres { pool, cache } => {
                let key = CacheKey::Product(id.clone());
                if let Some(CacheValue::Product(product)) = cache.get(&key).await {
                    debug!("Cache hit for product");
                    return Ok(Some(*product));
                }

                let product = ProductRepository::new(pool).get_by_id(id).await?;
                if let Some(product) = &product {
                    cache
                        .insert(key, CacheValue::Product(Box::new(product.clone())))
                        .await;
                }
                Ok(product)
            }
        }
    }

    /// Evaluate a listing query.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database query fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        match &*self.inner {
            Backend::Sample(catalog) => Ok(catalog.list_products(query)),
            Backend::Postgres { pool, cache } => {
                let key = CacheKey::Products(query.clone());
                if let Some(CacheValue::Products(products)) = cache.get(&key).await {
                    debug!("Cache hit for products");
                    return Ok(products.as_ref().clone());
                }

                let products = ProductRepository::new(pool).list(query).await?;
                cache
                    .insert(key, CacheValue::Products(Arc::new(products.clone())))
                    .await;
                Ok(products)
            }
        }
    }

    /// Featured products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database query fails.
    pub async fn list_featured(&self) -> Result<Vec<Product>, CatalogError> {
        self.list_products(&ProductQuery {
            facet: Some(Facet::Featured),
            ..ProductQuery::default()
        })
        .await
    }

    /// Products in `category` other than `exclude`, at most
    /// [`elegance_core::catalog::SIMILAR_PRODUCTS_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database query fails.
    #[instrument(skip(self, exclude), fields(exclude = %exclude))]
    pub async fn list_similar(
        &self,
        category: Category,
        exclude: &ProductId,
    ) -> Result<Vec<Product>, CatalogError> {
        match &*self.inner {
            Backend::Sample(catalog) => Ok(catalog.list_similar(category, exclude)),
            Backend::Postgres { pool, cache } => {
                let key = CacheKey::Similar(category, exclude.clone());
                if let Some(CacheValue::Products(products)) = cache.get(&key).await {
                    debug!("Cache hit for similar products");
                    return Ok(products.as_ref().clone());
                }

                let products = ProductRepository::new(pool)
                    .list_similar(category, exclude)
                    .await?;
                cache
                    .insert(key, CacheValue::Products(Arc::new(products.clone())))
                    .await;
                Ok(products)
            }
        }
    }

    /// Number of products in each category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database query fails.
    pub async fn category_counts(&self) -> Result<Vec<(Category, usize)>, CatalogError> {
        match &*self.inner {
            Backend::Sample(catalog) => Ok(catalog.category_counts()),
            Backend::Postgres { pool, cache } => {
                if let Some(CacheValue::CategoryCounts(counts)) =
                    cache.get(&CacheKey::CategoryCounts).await
                {
                    return Ok(counts.as_ref().clone());
                }

                let counts = ProductRepository::new(pool).category_counts().await?;
                cache
                    .insert(
                        CacheKey::CategoryCounts,
                        CacheValue::CategoryCounts(Arc::new(counts.clone())),
                    )
                    .await;
                Ok(counts)
            }
        }
    }

    /// Check that the backend can serve requests.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database is unreachable.
    pub async fn ping(&self) -> Result<(), CatalogError> {
        match &*self.inner {
            Backend::Sample(_) => Ok(()),
            Backend::Postgres { pool, .. } => {
                sqlx::query("SELECT 1")
                    .execute(pool)
                    .await
                    .map_err(RepositoryError::from)?;
                Ok(())
            }
        }
    }
}
