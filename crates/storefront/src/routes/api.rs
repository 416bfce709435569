//! JSON catalog and cart API.
//!
//! Errors render as `{"message": ...}` through [`ApiError`].

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use elegance_core::cart::CartLineItem;
use elegance_core::{Category, Product, ProductId};

use crate::cart;
use crate::error::{ApiError, AppError};
use crate::routes::products::ListingParams;
use crate::state::AppState;

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Query parameters for `/api/products/similar`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarParams {
    pub category: String,
    pub product_id: String,
}

/// One entry of `/api/products/categories`.
#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub name: &'static str,
    pub count: usize,
}

/// Body of `/api/cart`.
#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartLineItem>,
    pub count: u64,
    pub total: Decimal,
}

fn parse_id(raw: &str) -> Result<ProductId, AppError> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> ApiResult<Vec<Product>> {
    let query = params.to_query()?;
    Ok(Json(state.catalog().list_products(&query).await?))
}

/// `GET /api/products/featured`
#[instrument(skip(state))]
pub async fn list_featured(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    Ok(Json(state.catalog().list_featured().await?))
}

/// `GET /api/products/similar?category=..&productId=..`
#[instrument(skip(state))]
pub async fn list_similar(
    State(state): State<AppState>,
    Query(params): Query<SimilarParams>,
) -> ApiResult<Vec<Product>> {
    let category = params
        .category
        .parse::<Category>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let exclude = parse_id(&params.product_id)?;

    Ok(Json(state.catalog().list_similar(category, &exclude).await?))
}

/// `GET /api/products/categories`
#[instrument(skip(state))]
pub async fn category_counts(State(state): State<AppState>) -> ApiResult<Vec<CategoryCount>> {
    let counts = state.catalog().category_counts().await?;
    Ok(Json(
        counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category,
                name: category.display_name(),
                count,
            })
            .collect(),
    ))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let not_found = || AppError::NotFound("Product".to_string());

    let id = ProductId::parse(&id).map_err(|_| not_found())?;
    let product = state
        .catalog()
        .product_by_id(&id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(product))
}

/// `GET /api/cart`
#[instrument(skip(session))]
pub async fn get_cart(session: Session) -> Json<CartSummary> {
    let cart = cart::open(&session).await;
    cart::save(&session, &cart).await;

    Json(CartSummary {
        count: cart.count(),
        total: cart.total(),
        items: cart.items().to_vec(),
    })
}
