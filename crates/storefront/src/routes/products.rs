//! Product route handlers.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use elegance_core::catalog::{Facet, ProductQuery, SortBy};
use elegance_core::{Category, Price, Product, ProductId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub old_price: Option<String>,
    pub image: String,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub category: String,
    pub category_slug: String,
    pub in_stock: bool,
    pub count_in_stock: u32,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.display_price().to_string(),
            old_price: product.old_price.map(|p| Price::usd(p).to_string()),
            image: product.primary_image().unwrap_or_default().to_string(),
            images: product.images.clone(),
            features: product.features.clone(),
            category: product.category.display_name().to_string(),
            category_slug: product.category.as_str().to_string(),
            in_stock: product.in_stock(),
            count_in_stock: product.count_in_stock,
        }
    }
}

/// Convert catalog records for display.
pub fn views(products: &[Product]) -> Vec<ProductView> {
    products.iter().map(ProductView::from).collect()
}

/// A `<select>` option.
#[derive(Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}

/// Listing query parameters, shared by the listing page and the JSON API.
///
/// Empty values (as submitted by an untouched filter form) count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub category: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<usize>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(value: Option<&str>, name: &str) -> Result<Option<Decimal>> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };
    let price = Decimal::from_str(raw)
        .map_err(|_| AppError::BadRequest(format!("{name} must be a number")))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::BadRequest(format!("{name} cannot be negative")));
    }
    Ok(Some(price))
}

impl ListingParams {
    /// Translate to a catalog query.
    ///
    /// `category=all` means no filter. Unknown categories and malformed
    /// prices are rejected; unknown sort values fall back to newest.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for invalid parameters.
    pub fn to_query(&self) -> Result<ProductQuery> {
        let facet = match non_empty(self.category.as_deref()) {
            None | Some("all") => None,
            Some(raw) => Some(
                raw.parse::<Facet>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            ),
        };

        Ok(ProductQuery {
            facet,
            sort: non_empty(self.sort.as_deref())
                .map_or_else(SortBy::default, SortBy::parse_lenient),
            limit: self.limit,
            min_price: parse_price(self.min_price.as_deref(), "minPrice")?,
            max_price: parse_price(self.max_price.as_deref(), "maxPrice")?,
        })
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub heading: String,
    pub products: Vec<ProductView>,
    pub categories: Vec<OptionView>,
    pub sorts: Vec<OptionView>,
    pub selected_category: String,
    pub selected_sort: String,
    pub min_price: String,
    pub max_price: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub similar_products: Vec<ProductView>,
}

/// Missing product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub id: String,
}

fn category_options() -> Vec<OptionView> {
    let mut options = vec![OptionView {
        value: "all".to_string(),
        label: "All Products".to_string(),
    }];
    options.extend(
        Category::ALL
            .iter()
            .map(|&c| Facet::Category(c))
            .chain([Facet::Featured, Facet::New])
            .map(|facet| OptionView {
                value: facet.as_str().to_string(),
                label: facet.display_name().to_string(),
            }),
    );
    options
}

fn sort_options() -> Vec<OptionView> {
    [
        (SortBy::Newest, "Newest"),
        (SortBy::PriceLow, "Price: Low to High"),
        (SortBy::PriceHigh, "Price: High to Low"),
        (SortBy::NameAsc, "Name: A to Z"),
    ]
    .into_iter()
    .map(|(sort, label)| OptionView {
        value: sort.as_str().to_string(),
        label: label.to_string(),
    })
    .collect()
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<impl IntoResponse> {
    let query = params.to_query()?;
    let products = state.catalog().list_products(&query).await?;

    Ok(ProductsIndexTemplate {
        heading: query
            .facet
            .map_or("All Products", Facet::display_name)
            .to_string(),
        products: views(&products),
        categories: category_options(),
        sorts: sort_options(),
        selected_category: query.facet.map_or("all", Facet::as_str).to_string(),
        selected_sort: query.sort.as_str().to_string(),
        min_price: query.min_price.map(|p| p.to_string()).unwrap_or_default(),
        max_price: query.max_price.map(|p| p.to_string()).unwrap_or_default(),
    })
}

/// Display product detail page with similar products.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            ProductNotFoundTemplate { id: id.clone() },
        )
            .into_response()
    };

    let Ok(product_id) = ProductId::parse(&id) else {
        return Ok(not_found());
    };
    let Some(product) = state.catalog().product_by_id(&product_id).await? else {
        return Ok(not_found());
    };

    let similar = state
        .catalog()
        .list_similar(product.category, &product.id)
        .await?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
        similar_products: views(&similar),
    }
    .into_response())
}
