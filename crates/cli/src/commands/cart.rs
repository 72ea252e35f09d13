//! Cart management commands.
//!
//! Every command restores the cart from `STOREFRONT_DATA_DIR`, so changes made
//! here show up in the storefront after its next restart and vice versa.

use std::fmt::Write as _;
use std::sync::Arc;

use fakestore_core::{CartSummary, Category, ProductId};
use fakestore_storefront::cart::CartStore;
use fakestore_storefront::catalog::CatalogClient;
use fakestore_storefront::config::StorefrontConfig;
use fakestore_storefront::storage::FileStore;

use super::CliError;

fn open_cart(config: &StorefrontConfig) -> CartStore {
    CartStore::restore(Arc::new(FileStore::new(&config.data_dir)))
}

/// Print the cart contents.
#[allow(clippy::print_stdout)]
pub fn show(config: &StorefrontConfig) {
    print!("{}", format_summary(&open_cart(config).summary()));
}

/// Look the product up in `category` and add one unit of it.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or does not contain
/// the product.
#[allow(clippy::print_stdout)]
pub async fn add(
    config: &StorefrontConfig,
    product_id: ProductId,
    category: Option<&str>,
) -> Result<(), CliError> {
    let client = CatalogClient::new(&config.catalog)?;
    let category = category.map(Category::parse).unwrap_or_default();

    let product = client
        .fetch_catalog(&category)
        .await?
        .into_iter()
        .find(|p| p.id == product_id)
        .ok_or(CliError::UnknownProduct(product_id))?;

    let title = product.title.clone();
    let mut cart = open_cart(config);
    let quantity = cart.add_product(product);

    println!("Added {title} (quantity {quantity})");
    println!("Total: {}", cart.grand_total());
    Ok(())
}

/// Remove a product line; removing an absent product is not an error.
#[allow(clippy::print_stdout)]
pub fn remove(config: &StorefrontConfig, product_id: ProductId) {
    let mut cart = open_cart(config);
    if cart.remove_product(product_id) {
        println!("Removed product {product_id}");
    } else {
        println!("Product {product_id} was not in the cart");
    }
    println!("Total: {}", cart.grand_total());
}

/// Empty the cart.
#[allow(clippy::print_stdout)]
pub fn clear(config: &StorefrontConfig) {
    open_cart(config).clear();
    println!("Cart cleared");
}

/// Render the cart as a plain-text table.
#[must_use]
pub fn format_summary(summary: &CartSummary) -> String {
    if summary.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for line in &summary.lines {
        let _ = writeln!(
            out,
            "{:>4}  {:>3} x {:>9}  {:>9}  {}",
            line.product_id.as_i64(),
            line.quantity,
            line.unit_price.to_string(),
            line.line_total.to_string(),
            line.title
        );
    }
    let _ = writeln!(
        out,
        "{} items, total {}",
        summary.item_count,
        summary.grand_total
    );
    out
}
