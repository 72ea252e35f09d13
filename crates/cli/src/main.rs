//! Fakestore CLI - browse the catalog and manage the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! fakestore catalog
//!
//! # List one category, filtered by title
//! fakestore catalog --category electronics --search ssd
//!
//! # List category names
//! fakestore categories
//!
//! # Manage the cart shared with the storefront server
//! fakestore cart show
//! fakestore cart add 3 --category "men's clothing"
//! fakestore cart remove 3
//! fakestore cart clear
//! ```
//!
//! The CLI reads the same environment variables as the storefront server, so
//! `STOREFRONT_DATA_DIR` selects which cart it operates on.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fakestore_core::ProductId;
use fakestore_storefront::config::StorefrontConfig;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "fakestore")]
#[command(author, version, about = "Fakestore catalog and cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in a category
    Catalog {
        /// Category name (defaults to all categories)
        #[arg(short, long)]
        category: Option<String>,

        /// Only show products whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List category names
    Categories,
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,

        /// Category to look the product up in
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;

    match cli.command {
        Commands::Catalog { category, search } => {
            commands::catalog::list(&config, category.as_deref(), search.as_deref()).await?;
        }
        Commands::Categories => commands::catalog::categories(&config).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config),
            CartAction::Add { id, category } => {
                commands::cart::add(&config, id, category.as_deref()).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(&config, id),
            CartAction::Clear => commands::cart::clear(&config),
        },
    }
    Ok(())
}
