//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use elegance_core::Category;
use elegance_core::catalog::{Facet, ProductQuery};

use crate::filters;
use crate::routes::products::{ProductView, views};
use crate::state::AppState;

/// Category card on the home page.
#[derive(Clone)]
pub struct CategoryCardView {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub count: usize,
}

impl CategoryCardView {
    fn new(category: Category, count: usize) -> Self {
        Self {
            slug: category.as_str().to_string(),
            name: category.display_name().to_string(),
            description: category.description().to_string(),
            count,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured_products: Vec<ProductView>,
    pub new_arrivals: Vec<ProductView>,
    pub categories: Vec<CategoryCardView>,
}

/// Display the home page.
///
/// Each section degrades to empty on a catalog failure so the page still
/// renders.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog();

    let featured_products = catalog.list_featured().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        },
        |products| views(&products),
    );

    let new_arrivals = catalog
        .list_products(&ProductQuery {
            facet: Some(Facet::New),
            ..ProductQuery::default()
        })
        .await
        .map_or_else(
            |e| {
                tracing::error!("Failed to fetch new arrivals: {e}");
                Vec::new()
            },
            |products| views(&products),
        );

    let categories = catalog.category_counts().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch category counts: {e}");
            Category::ALL
                .iter()
                .map(|&c| CategoryCardView::new(c, 0))
                .collect()
        },
        |counts| {
            counts
                .iter()
                .map(|&(c, n)| CategoryCardView::new(c, n))
                .collect()
        },
    );

    HomeTemplate {
        featured_products,
        new_arrivals,
        categories,
    }
}
