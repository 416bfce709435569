//! Elegance CLI - Database migrations, catalog seeding and a terminal cart.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! elegance migrate
//!
//! # Load the bundled sample products (or --file products.yaml)
//! elegance seed --clear
//!
//! # Work with a cart stored in a local JSON file
//! elegance cart add 2 --quantity 3
//! elegance cart show
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Upsert products from a YAML file
//! - `cart` - Show or modify the local cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod storage;

use commands::cart::Action;

#[derive(Parser)]
#[command(name = "elegance")]
#[command(author, version, about = "Elegance CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the products table
    Seed {
        /// YAML product list (defaults to the bundled sample catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Delete existing products first
        #[arg(long)]
        clear: bool,
    },
    /// Manage the local cart
    Cart {
        /// Cart file (defaults to $ELEGANCE_CART_FILE or the user data dir)
        #[arg(long, global = true)]
        cart_file: Option<PathBuf>,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add a product
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (below 1 removes it)
    Update {
        product_id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

impl From<CartAction> for Action {
    fn from(action: CartAction) -> Self {
        match action {
            CartAction::Show => Self::Show,
            CartAction::Add {
                product_id,
                quantity,
            } => Self::Add {
                product_id,
                quantity,
            },
            CartAction::Update {
                product_id,
                quantity,
            } => Self::Update {
                product_id,
                quantity,
            },
            CartAction::Remove { product_id } => Self::Remove { product_id },
            CartAction::Clear => Self::Clear,
        }
    }
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "elegance=info,elegance_storefront=info,sqlx=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, clear } => {
            commands::seed::products(file.as_deref(), clear).await?;
        }
        Commands::Cart { cart_file, action } => {
            commands::cart::run(action.into(), cart_file).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_accepts_negative_quantity() {
        let cli = Cli::try_parse_from(["elegance", "cart", "update", "3", "-1"]);
        let Ok(Cli {
            command: Commands::Cart { action, .. },
        }) = cli
        else {
            panic!("expected cart command");
        };
        assert_eq!(
            Action::from(action),
            Action::Update {
                product_id: "3".to_string(),
                quantity: -1,
            }
        );
    }

    #[test]
    fn test_add_defaults_to_one() {
        let cli = Cli::try_parse_from(["elegance", "cart", "add", "5"]);
        let Ok(Cli {
            command: Commands::Cart { action, .. },
        }) = cli
        else {
            panic!("expected cart command");
        };
        assert_eq!(
            Action::from(action),
            Action::Add {
                product_id: "5".to_string(),
                quantity: 1,
            }
        );
    }
}
