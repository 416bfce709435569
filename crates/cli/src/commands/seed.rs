//! Seed the `products` table from a YAML file.
//!
//! The file format is the one bundled as the sample catalog
//! (`crates/storefront/seed/products.yaml`), which is also the default.

use std::path::Path;

use tracing::info;

use elegance_storefront::catalog::{SAMPLE_PRODUCTS_YAML, load_products};
use elegance_storefront::config::StorefrontConfig;
use elegance_storefront::db::ProductRepository;

use crate::error::CliError;

/// Seed products.
///
/// Records are validated before connecting; existing ids are updated in place.
///
/// # Arguments
///
/// * `file_path` - YAML product list, or `None` for the bundled sample data
/// * `clear_existing` - If true, delete every product first
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a record is invalid,
/// or a database operation fails.
pub async fn products(file_path: Option<&Path>, clear_existing: bool) -> Result<(), CliError> {
    let content = match file_path {
        Some(path) => {
            info!(path = %path.display(), "Loading products from file");
            tokio::fs::read_to_string(path).await?
        }
        None => {
            info!("Loading bundled sample products");
            SAMPLE_PRODUCTS_YAML.to_string()
        }
    };

    let catalog = load_products(&content)?;
    info!(products = catalog.all().len(), "Product file validated");

    let config = StorefrontConfig::from_env()?;
    let pool = super::connect(&config).await?;
    let repo = ProductRepository::new(&pool);

    if clear_existing {
        let removed = repo.delete_all().await?;
        info!(removed, "Cleared existing products");
    }

    for product in catalog.all() {
        repo.upsert(product).await?;
    }

    info!("Seeding complete!");
    info!("  Products upserted: {}", catalog.all().len());
    Ok(())
}
