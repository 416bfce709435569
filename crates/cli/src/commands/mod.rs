//! CLI subcommands.

pub mod cart;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;

use elegance_storefront::config::StorefrontConfig;
use elegance_storefront::db;

use crate::error::CliError;

/// Connect to the configured storefront database.
///
/// # Errors
///
/// Returns `CliError::MissingDatabaseUrl` when no URL is configured.
pub async fn connect(config: &StorefrontConfig) -> Result<PgPool, CliError> {
    let url = config
        .database_url
        .as_ref()
        .ok_or(CliError::MissingDatabaseUrl)?;
    let pool = db::create_pool(url).await?;
    tracing::info!("Connected to database");
    Ok(pool)
}
