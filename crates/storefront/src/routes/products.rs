//! Product grid handlers.
//!
//! Changing the category re-fetches the catalog; the `q` search parameter
//! only filters products that are already loaded.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use fakestore_core::{Category, Product};
use serde::Deserialize;
use tracing::instrument;

use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub title: String,
    pub price: String,
    pub image: String,
    pub category: String,
    pub in_cart: bool,
    pub quantity: u32,
}

/// Category menu entry.
#[derive(Clone)]
pub struct CategoryLink {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

/// Everything the product grid needs to render.
#[derive(Clone)]
pub struct ProductGridView {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<CategoryLink>,
    pub selected_label: String,
    pub query: String,
    pub error: String,
}

/// Browse query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: ProductGridView,
}

/// Display the product grid fragment.
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> impl IntoResponse {
    ProductGridTemplate {
        grid: browse(&state, &query).await,
    }
}

/// Apply the browse query and build the grid view.
///
/// Fetches the catalog when the requested category differs from the current
/// selection, or when nothing has been loaded yet.
pub async fn browse(state: &AppState, query: &BrowseQuery) -> ProductGridView {
    let requested = query.category.as_deref().map(Category::parse);

    let needs_fetch = {
        let catalog = state.catalog().lock().await;
        match &requested {
            Some(category) => category != catalog.selected() || !catalog.is_loaded(),
            None => !catalog.is_loaded(),
        }
    };

    if needs_fetch {
        let category = match requested {
            Some(category) => category,
            None => state.catalog().lock().await.selected().clone(),
        };
        state.refresh_catalog(category).await;
    }

    let search = query.q.as_deref().unwrap_or_default();
    let (products, categories, selected, error) = {
        let catalog = state.catalog().lock().await;
        let products: Vec<Product> = catalog.search(search).cloned().collect();
        (
            products,
            catalog.categories().to_vec(),
            catalog.selected().clone(),
            catalog.last_error().map(str::to_string),
        )
    };

    let cart = state.cart().lock().await;
    let products = products
        .into_iter()
        .map(|product| {
            let quantity = cart.cart().quantity_of(product.id);
            ProductCardView {
                id: product.id.as_i64(),
                price: product.price.to_string(),
                category: product.category.unwrap_or_default(),
                title: product.title,
                image: product.image,
                in_cart: quantity > 0,
                quantity,
            }
        })
        .collect();
    drop(cart);

    ProductGridView {
        products,
        categories: category_links(&categories, &selected),
        selected_label: selected.label().to_string(),
        query: search.to_string(),
        error: error.map_or_else(String::new, |_| {
            "The catalog is unavailable right now.".to_string()
        }),
    }
}

/// Build the category menu, always starting with "All Categories".
fn category_links(categories: &[String], selected: &Category) -> Vec<CategoryLink> {
    std::iter::once(Category::All)
        .chain(categories.iter().map(|name| Category::parse(name)))
        .map(|category| CategoryLink {
            label: category.label().to_string(),
            value: urlencoding::encode(&category.to_string()).into_owned(),
            selected: &category == selected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_links() {
        let categories = vec!["electronics".to_string(), "men's clothing".to_string()];
        let links = category_links(&categories, &Category::parse("men's clothing"));

        let labels: Vec<&str> = links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["All Categories", "electronics", "men's clothing"]);
        assert_eq!(links[0].value, "all");
        assert_eq!(links[2].value, "men%27s%20clothing");
        assert!(links[2].selected);
        assert!(!links[0].selected);
    }
}
