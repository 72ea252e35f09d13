//! CLI command implementations.

pub mod cart;
pub mod catalog;

use fakestore_core::ProductId;
use fakestore_storefront::catalog::CatalogError;
use fakestore_storefront::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Catalog request failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Product {0} is not in the catalog")]
    UnknownProduct(ProductId),
}
