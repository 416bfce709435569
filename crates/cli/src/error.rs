//! CLI error type.

use thiserror::Error;

use elegance_storefront::catalog::CatalogError;
use elegance_storefront::config::ConfigError;
use elegance_storefront::db::RepositoryError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The command needs a database but none is configured.
    #[error("STOREFRONT_DATABASE_URL (or DATABASE_URL) must be set for this command")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No platform data directory and no `ELEGANCE_CART_FILE`.
    #[error("Could not determine a location for the cart file; set ELEGANCE_CART_FILE")]
    NoCartLocation,
}
