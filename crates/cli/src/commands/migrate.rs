//! Database migration command.
//!
//! ```bash
//! elegance migrate
//! ```
//!
//! Applies `crates/storefront/migrations/` (products and session tables) to
//! `STOREFRONT_DATABASE_URL`.

use elegance_storefront::config::StorefrontConfig;

use crate::error::CliError;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database is not configured or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;
    let pool = super::connect(&config).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
