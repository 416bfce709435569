//! Product repository for database operations.
//!
//! Listing queries are built at runtime with `QueryBuilder` because the
//! filters and sort order vary per request. Ordering mirrors
//! [`SortBy::compare`] so both catalog backends agree.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use elegance_core::catalog::{
    Facet, NEW_ARRIVALS_LIMIT, ProductQuery, SIMILAR_PRODUCTS_LIMIT, SortBy,
};
use elegance_core::{Category, Product, ProductId};

use super::RepositoryError;

const COLUMNS: &str = "id, name, price, old_price, description, category, featured, images, \
                       features, count_in_stock";

/// A `products` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    price: Decimal,
    old_price: Option<Decimal>,
    description: String,
    category: Category,
    featured: bool,
    images: Vec<String>,
    features: Vec<String>,
    count_in_stock: i32,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let count_in_stock = u32::try_from(row.count_in_stock).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative stock count for product {}",
                row.id
            ))
        })?;

        let product = Self {
            id: row.id,
            name: row.name,
            price: row.price,
            old_price: row.old_price,
            description: row.description,
            category: row.category,
            featured: row.featured,
            images: row.images,
            features: row.features,
            count_in_stock,
        };
        product
            .validate()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
        Ok(product)
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

const fn order_clause(sort: SortBy) -> &'static str {
    match sort {
        SortBy::Newest => r#"id COLLATE "C" DESC"#,
        SortBy::PriceLow => r#"price ASC, id COLLATE "C" DESC"#,
        SortBy::PriceHigh => r#"price DESC, id COLLATE "C" DESC"#,
        SortBy::NameAsc => r#"lower(name COLLATE "C") ASC, id COLLATE "C" DESC"#,
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Append the facet and price filters of `query` as a `WHERE` clause.
fn push_filters<'q>(builder: &mut QueryBuilder<'q, Postgres>, query: &ProductQuery) {
    let mut separator = " WHERE ";
    match query.facet {
        Some(Facet::Category(category)) => {
            builder.push(separator).push("category = ").push_bind(category);
            separator = " AND ";
        }
        Some(Facet::Featured) => {
            builder.push(separator).push("featured");
            separator = " AND ";
        }
        Some(Facet::New) | None => {}
    }
    if let Some(min) = query.min_price {
        builder.push(separator).push("price >= ").push_bind(min);
        separator = " AND ";
    }
    if let Some(max) = query.max_price {
        builder.push(separator).push("price <= ").push_bind(max);
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Evaluate a listing query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or a row is invalid.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM "));

        if query.facet == Some(Facet::New) {
            builder.push("(SELECT * FROM products");
            push_filters(&mut builder, query);
            builder
                .push(" ORDER BY ")
                .push(order_clause(SortBy::Newest))
                .push(" LIMIT ")
                .push_bind(to_i64(NEW_ARRIVALS_LIMIT))
                .push(") AS newest");
        } else {
            builder.push("products");
            push_filters(&mut builder, query);
        }

        builder.push(" ORDER BY ").push(order_clause(query.sort));
        if let Some(limit) = query.effective_limit() {
            builder.push(" LIMIT ").push_bind(to_i64(limit));
        }

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool)
            .await?;
        into_products(rows)
    }

    /// Up to [`SIMILAR_PRODUCTS_LIMIT`] products in `category` other than
    /// `exclude`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or a row is invalid.
    pub async fn list_similar(
        &self,
        category: Category,
        exclude: &ProductId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM products
            WHERE category = $1 AND id <> $2
            ORDER BY created_at ASC, id COLLATE "C" ASC
            LIMIT $3
            "#
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(category)
            .bind(exclude)
            .bind(to_i64(SIMILAR_PRODUCTS_LIMIT))
            .fetch_all(self.pool)
            .await?;
        into_products(rows)
    }

    /// Number of products in each category, in [`Category::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_counts(&self) -> Result<Vec<(Category, usize)>, RepositoryError> {
        let rows: Vec<(Category, i64)> =
            sqlx::query_as("SELECT category, COUNT(*) FROM products GROUP BY category")
                .fetch_all(self.pool)
                .await?;

        Ok(Category::ALL
            .iter()
            .map(|&category| {
                let count = rows
                    .iter()
                    .find(|(c, _)| *c == category)
                    .map_or(0, |&(_, n)| usize::try_from(n).unwrap_or(0));
                (category, count)
            })
            .collect())
    }

    /// Insert a product, or replace the stored record with the same ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO products
                (id, name, price, old_price, description, category, featured,
                 images, features, count_in_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                price = EXCLUDED.price,
                old_price = EXCLUDED.old_price,
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                featured = EXCLUDED.featured,
                images = EXCLUDED.images,
                features = EXCLUDED.features,
                count_in_stock = EXCLUDED.count_in_stock,
                updated_at = now()
            ",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.old_price)
        .bind(&product.description)
        .bind(product.category)
        .bind(product.featured)
        .bind(&product.images)
        .bind(&product.features)
        .bind(i32::try_from(product.count_in_stock).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete every product. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM products")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
