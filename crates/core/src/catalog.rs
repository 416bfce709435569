//! Product listing queries.
//!
//! [`ProductQuery`] describes a listing request the way the catalog API
//! receives it. [`InMemoryCatalog`] evaluates queries over a fixed set of
//! records; database-backed catalogs translate the same query to SQL and must
//! return the same results for the same records.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Category, CategoryError, Product, ProductError, ProductId};

/// Maximum number of similar products returned for a product page.
pub const SIMILAR_PRODUCTS_LIMIT: usize = 4;

/// Number of products shown under the "new" facet.
pub const NEW_ARRIVALS_LIMIT: usize = 4;

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Most recently added first (product ID descending).
    #[default]
    Newest,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Alphabetical by name.
    NameAsc,
}

impl SortBy {
    /// Parse a `sort` query value. Unknown values fall back to [`SortBy::Newest`].
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "price_low" => Self::PriceLow,
            "price_high" => Self::PriceHigh,
            "name_asc" => Self::NameAsc,
            _ => Self::Newest,
        }
    }

    /// The query-string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLow => "price_low",
            Self::PriceHigh => "price_high",
            Self::NameAsc => "name_asc",
        }
    }

    /// Compare two products under this order.
    ///
    /// Ties are broken by product ID so the order is total and stable across
    /// backends. Name order folds ASCII case only and otherwise compares
    /// bytes, matching `lower(name COLLATE "C")` in PostgreSQL.
    #[must_use]
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        let primary = match self {
            Self::Newest => Ordering::Equal,
            Self::PriceLow => a.price.cmp(&b.price),
            Self::PriceHigh => b.price.cmp(&a.price),
            Self::NameAsc => a
                .name
                .to_ascii_lowercase()
                .cmp(&b.name.to_ascii_lowercase()),
        };
        primary.then_with(|| b.id.cmp(&a.id))
    }
}

/// A listing filter.
///
/// The `category` query parameter accepts both real categories and the
/// derived `featured`/`new` facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    /// Products stored under one category.
    Category(Category),
    /// Products with the featured flag set.
    Featured,
    /// The newest [`NEW_ARRIVALS_LIMIT`] products.
    New,
}

impl Facet {
    /// The query-string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category(category) => category.as_str(),
            Self::Featured => "featured",
            Self::New => "new",
        }
    }

    /// Heading shown above a filtered listing.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Category(category) => category.display_name(),
            Self::Featured => "Featured",
            Self::New => "New Arrivals",
        }
    }
}

impl std::str::FromStr for Facet {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "featured" => Ok(Self::Featured),
            "new" => Ok(Self::New),
            other => other.parse().map(Self::Category),
        }
    }
}

/// A product listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductQuery {
    pub facet: Option<Facet>,
    pub sort: SortBy,
    /// Maximum number of results; `None` or `Some(0)` means unlimited.
    pub limit: Option<usize>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

impl ProductQuery {
    /// A query for one category.
    #[must_use]
    pub fn category(category: Category) -> Self {
        Self {
            facet: Some(Facet::Category(category)),
            ..Self::default()
        }
    }

    /// Set the sort order.
    #[must_use]
    pub const fn sorted_by(mut self, sort: SortBy) -> Self {
        self.sort = sort;
        self
    }

    /// Set the result limit.
    #[must_use]
    pub const fn limited_to(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The effective limit after combining `limit` with the facet's own cap.
    #[must_use]
    pub fn effective_limit(&self) -> Option<usize> {
        let requested = self.limit.filter(|&n| n > 0);
        match (self.facet, requested) {
            (Some(Facet::New), Some(n)) => Some(n.min(NEW_ARRIVALS_LIMIT)),
            (Some(Facet::New), None) => Some(NEW_ARRIVALS_LIMIT),
            (_, requested) => requested,
        }
    }

    /// Whether `product` passes the facet and price filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let facet_ok = match self.facet {
            Some(Facet::Category(category)) => product.category == category,
            Some(Facet::Featured) => product.featured,
            Some(Facet::New) | None => true,
        };
        facet_ok
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }
}

/// A read-only catalog over records held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    /// Build a catalog, validating every record and rejecting duplicate IDs.
    ///
    /// # Errors
    ///
    /// Returns the first invalid record's error, or
    /// [`CatalogDataError::DuplicateId`] if two records share an ID.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogDataError> {
        let mut seen = std::collections::HashSet::new();
        for product in &products {
            product.validate()?;
            if !seen.insert(&product.id) {
                return Err(CatalogDataError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Every record, in load order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up one product.
    #[must_use]
    pub fn product_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Evaluate a listing query.
    ///
    /// The `new` facet sorts by newest before applying its cap so it always
    /// selects the most recent products, then applies the requested order.
    #[must_use]
    pub fn list_products(&self, query: &ProductQuery) -> Vec<Product> {
        let mut results: Vec<Product> = self
            .products
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();

        if query.facet == Some(Facet::New) {
            results.sort_by(|a, b| SortBy::Newest.compare(a, b));
            results.truncate(NEW_ARRIVALS_LIMIT);
        }

        results.sort_by(|a, b| query.sort.compare(a, b));
        if let Some(limit) = query.effective_limit() {
            results.truncate(limit);
        }
        results
    }

    /// Products with the featured flag, newest first.
    #[must_use]
    pub fn list_featured(&self) -> Vec<Product> {
        self.list_products(&ProductQuery {
            facet: Some(Facet::Featured),
            ..ProductQuery::default()
        })
    }

    /// Up to [`SIMILAR_PRODUCTS_LIMIT`] products in `category`, excluding
    /// `exclude`, in catalog order.
    #[must_use]
    pub fn list_similar(&self, category: Category, exclude: &ProductId) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category == category && &p.id != exclude)
            .take(SIMILAR_PRODUCTS_LIMIT)
            .cloned()
            .collect()
    }

    /// Number of products in each category, in [`Category::ALL`] order.
    #[must_use]
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|&c| (c, self.products.iter().filter(|p| p.category == c).count()))
            .collect()
    }
}

/// Errors raised while loading catalog records.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogDataError {
    #[error(transparent)]
    InvalidProduct(#[from] ProductError),
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::product::tests::product;

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    /// Mirrors the shape of the sample catalog: three categories, mixed
    /// featured flags.
    fn catalog() -> InMemoryCatalog {
        let mut records = vec![
            product("1", "Premium Wireless Headphones", 29999, Category::Electronics),
            product("2", "Minimalist Desk Lamp", 8999, Category::Home),
            product("3", "Smart Watch Series 5", 39999, Category::Electronics),
            product("4", "Italian Leather Wallet", 7999, Category::Fashion),
            product("5", "Ceramic Pour-Over Coffee Set", 6499, Category::Home),
            product("6", "Wool Cashmere Scarf", 12999, Category::Fashion),
            product("7", "Portable Bluetooth Speaker", 15999, Category::Electronics),
            product("8", "Minimalist Wall Clock", 4999, Category::Home),
        ];
        for record in &mut records {
            record.featured = matches!(record.id.as_str(), "1" | "2" | "3" | "5");
        }
        InMemoryCatalog::new(records).unwrap()
    }

    #[test]
    fn test_default_query_is_newest_first() {
        let all = catalog().list_products(&ProductQuery::default());
        assert_eq!(ids(&all), ["8", "7", "6", "5", "4", "3", "2", "1"]);
    }

    #[test]
    fn test_category_filter() {
        let home = catalog().list_products(&ProductQuery::category(Category::Home));
        assert_eq!(ids(&home), ["8", "5", "2"]);
    }

    #[test]
    fn test_price_sorts() {
        let cat = catalog();
        let low = cat.list_products(&ProductQuery::default().sorted_by(SortBy::PriceLow));
        assert_eq!(low[0].id.as_str(), "8");
        assert_eq!(low[7].id.as_str(), "3");

        let high = cat.list_products(&ProductQuery::default().sorted_by(SortBy::PriceHigh));
        assert_eq!(ids(&high)[..3], ["3", "1", "7"]);
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let records = vec![
            product("1", "Banana stand", 100, Category::Home),
            product("2", "apple crate", 100, Category::Home),
        ];
        let cat = InMemoryCatalog::new(records).unwrap();
        let sorted = cat.list_products(&ProductQuery::default().sorted_by(SortBy::NameAsc));
        assert_eq!(ids(&sorted), ["2", "1"]);
    }

    #[test]
    fn test_name_sort_folds_ascii_case_only() {
        let records = vec![
            product("1", "ñandu print", 100, Category::Home),
            product("2", "Ñu rug", 100, Category::Home),
            product("3", "Zebra throw", 100, Category::Home),
        ];
        let cat = InMemoryCatalog::new(records).unwrap();
        let sorted = cat.list_products(&ProductQuery::default().sorted_by(SortBy::NameAsc));
        assert_eq!(ids(&sorted), ["3", "2", "1"]);
    }

    #[test]
    fn test_limit_zero_means_unlimited() {
        let cat = catalog();
        assert_eq!(cat.list_products(&ProductQuery::default().limited_to(0)).len(), 8);
        assert_eq!(cat.list_products(&ProductQuery::default().limited_to(3)).len(), 3);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let query = ProductQuery {
            min_price: Some(Decimal::new(6499, 2)),
            max_price: Some(Decimal::new(12999, 2)),
            sort: SortBy::PriceLow,
            ..ProductQuery::default()
        };
        let results = catalog().list_products(&query);
        assert_eq!(ids(&results), ["5", "4", "2", "6"]);
    }

    #[test]
    fn test_featured_facet() {
        let featured = catalog().list_featured();
        assert_eq!(ids(&featured), ["5", "3", "2", "1"]);
        assert!(featured.iter().all(|p| p.featured));
    }

    #[test]
    fn test_new_facet_caps_then_sorts() {
        let query = ProductQuery {
            facet: Some(Facet::New),
            sort: SortBy::PriceLow,
            ..ProductQuery::default()
        };
        let results = catalog().list_products(&query);
        // Newest four are 8, 7, 6, 5; re-ordered by price.
        assert_eq!(ids(&results), ["8", "5", "6", "7"]);
        assert_eq!(query.effective_limit(), Some(NEW_ARRIVALS_LIMIT));
    }

    #[test]
    fn test_similar_excludes_and_caps() {
        let cat = catalog();
        let similar = cat.list_similar(Category::Electronics, &ProductId::parse("1").unwrap());
        assert_eq!(ids(&similar), ["3", "7"]);

        let many: Vec<Product> = (0..10)
            .map(|i| product(&format!("p{i}"), "x", 100, Category::Home))
            .collect();
        let cat = InMemoryCatalog::new(many).unwrap();
        let similar = cat.list_similar(Category::Home, &ProductId::parse("p0").unwrap());
        assert_eq!(similar.len(), SIMILAR_PRODUCTS_LIMIT);
        assert!(similar.iter().all(|p| p.id.as_str() != "p0"));
    }

    #[test]
    fn test_category_counts() {
        assert_eq!(
            catalog().category_counts(),
            vec![
                (Category::Electronics, 3),
                (Category::Fashion, 2),
                (Category::Home, 3)
            ]
        );
    }

    #[test]
    fn test_facet_parsing() {
        assert_eq!("featured".parse::<Facet>().unwrap(), Facet::Featured);
        assert_eq!("NEW".parse::<Facet>().unwrap(), Facet::New);
        assert_eq!(
            "fashion".parse::<Facet>().unwrap(),
            Facet::Category(Category::Fashion)
        );
        assert!("toys".parse::<Facet>().is_err());
    }

    #[test]
    fn test_sort_parse_is_lenient() {
        assert_eq!(SortBy::parse_lenient("price_high"), SortBy::PriceHigh);
        assert_eq!(SortBy::parse_lenient("bogus"), SortBy::Newest);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let records = vec![
            product("1", "a", 100, Category::Home),
            product("1", "b", 100, Category::Home),
        ];
        assert!(matches!(
            InMemoryCatalog::new(records),
            Err(CatalogDataError::DuplicateId(_))
        ));
    }
}
