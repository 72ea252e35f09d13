//! Catalog listing commands.
//!
//! # Usage
//!
//! ```bash
//! fakestore catalog --category jewelery
//! fakestore catalog --search backpack
//! fakestore categories
//! ```

use fakestore_core::{Category, Product};
use fakestore_storefront::catalog::CatalogClient;
use fakestore_storefront::config::StorefrontConfig;

use super::CliError;

/// Fetch a category and print the products whose titles match `search`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
#[allow(clippy::print_stdout)]
pub async fn list(
    config: &StorefrontConfig,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<(), CliError> {
    let client = CatalogClient::new(&config.catalog)?;
    let category = category.map(Category::parse).unwrap_or_default();

    tracing::info!(%category, "Fetching catalog");
    let products = client.fetch_catalog(&category).await?;

    let query = search.unwrap_or_default();
    let matches: Vec<&Product> = products.iter().filter(|p| p.title_matches(query)).collect();

    println!("{} ({} products)", category.label(), matches.len());
    for product in matches {
        println!("{}", format_product(product));
    }
    Ok(())
}

/// Print the category names offered by the catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
#[allow(clippy::print_stdout)]
pub async fn categories(config: &StorefrontConfig) -> Result<(), CliError> {
    let client = CatalogClient::new(&config.catalog)?;
    for name in client.fetch_categories().await? {
        println!("{name}");
    }
    Ok(())
}

/// One listing line: id, price and title.
#[must_use]
pub fn format_product(product: &Product) -> String {
    format!(
        "{:>4}  {:>9}  {}",
        product.id.as_i64(),
        product.price.to_string(),
        product.title
    )
}

#[cfg(test)]
mod tests {
    use fakestore_core::{Price, ProductId};

    use super::*;

    #[test]
    fn test_format_product() {
        let product = Product {
            id: ProductId::new(7),
            title: "White Gold Plated Princess".to_string(),
            price: Price::from_cents(999),
            image: String::new(),
            category: Some("jewelery".to_string()),
        };
        assert_eq!(
            format_product(&product),
            "   7      $9.99  White Gold Plated Princess"
        );
    }
}
