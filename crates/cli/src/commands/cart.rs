//! Terminal cart backed by a local JSON file.
//!
//! ```bash
//! elegance cart add 2 --quantity 3
//! elegance cart update 2 1
//! elegance cart show
//! elegance cart remove 2
//! elegance cart clear
//! ```
//!
//! Products are looked up in the catalog selected by `CATALOG_SOURCE`.

#![allow(clippy::print_stdout)]

use std::num::NonZeroU32;
use std::path::PathBuf;

use elegance_core::cart::{CartNotice, CartStorage, CartStore};
use elegance_core::{Price, ProductId};
use elegance_storefront::catalog::Catalog;
use elegance_storefront::config::{CatalogSource, StorefrontConfig};

use crate::error::CliError;
use crate::storage::{FileStorage, default_cart_path};

/// A cart subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Show,
    Add { product_id: String, quantity: u32 },
    Update { product_id: String, quantity: i64 },
    Remove { product_id: String },
    Clear,
}

fn parse_id(raw: &str) -> Result<ProductId, CliError> {
    ProductId::parse(raw).map_err(|e| CliError::InvalidArgument(e.to_string()))
}

async fn open_catalog() -> Result<Catalog, CliError> {
    let config = StorefrontConfig::from_env()?;
    match config.catalog.source {
        CatalogSource::Sample => Ok(Catalog::sample()?),
        CatalogSource::Postgres => {
            let pool = super::connect(&config).await?;
            Ok(Catalog::postgres(pool, config.catalog.cache_ttl))
        }
    }
}

/// Render the cart as text lines.
pub fn render<S: CartStorage>(cart: &CartStore<S>) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Your cart is empty.".to_string()];
    }

    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|line| {
            format!(
                "{:>4} x {} ({}) @ {} = {}",
                line.quantity,
                line.name,
                line.product_id,
                line.display_price(),
                Price::usd(line.line_total()),
            )
        })
        .collect();
    lines.push(format!(
        "{} item(s), subtotal {}",
        cart.count(),
        Price::usd(cart.total())
    ));
    lines
}

/// Apply `action` to the cart at `path` (or the default location).
///
/// # Errors
///
/// Returns an error for an unknown product, a malformed id, or when the
/// catalog or cart location is unavailable.
pub async fn run(action: Action, path: Option<PathBuf>) -> Result<(), CliError> {
    let path = match path {
        Some(path) => path,
        None => default_cart_path()?,
    };
    tracing::debug!(path = %path.display(), "Opening cart file");

    let mut cart = CartStore::open(FileStorage::new(path));
    let notice = apply(&mut cart, action).await?;

    if let Some(notice) = notice {
        println!("{notice}");
    }
    for line in render(&cart) {
        println!("{line}");
    }
    Ok(())
}

async fn apply<S: CartStorage>(
    cart: &mut CartStore<S>,
    action: Action,
) -> Result<Option<CartNotice>, CliError> {
    let notice = match action {
        Action::Show => None,
        Action::Add {
            product_id,
            quantity,
        } => {
            let id = parse_id(&product_id)?;
            let product = open_catalog()
                .await?
                .product_by_id(&id)
                .await?
                .ok_or(CliError::ProductNotFound(product_id))?;
            let quantity = NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN);
            Some(cart.add_item(&product, quantity))
        }
        Action::Update {
            product_id,
            quantity,
        } => cart.update_quantity(&parse_id(&product_id)?, quantity),
        Action::Remove { product_id } => cart.remove_item(&parse_id(&product_id)?),
        Action::Clear => Some(cart.clear()),
    };
    Ok(notice)
}
