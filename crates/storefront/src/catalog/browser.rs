//! Browse state for the catalog: current category, current products, search.
//!
//! Fetches are split into [`CatalogBrowser::begin_fetch`] and
//! [`CatalogBrowser::complete_fetch`] so the network call can run without
//! holding any lock. Each fetch gets a [`FetchTicket`]; a result is applied
//! only if its ticket still names the current selection and generation, so a
//! slow response for an old category can never overwrite a newer one.

use fakestore_core::{Category, Product, ProductId};
use tracing::{debug, warn};

use super::CatalogError;

/// Identifies one catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    category: Category,
}

impl FetchTicket {
    /// The category this fetch was started for.
    #[must_use]
    pub const fn category(&self) -> &Category {
        &self.category
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Products replaced; holds the new product count.
    Applied(usize),
    /// A newer fetch was started since; the result was discarded.
    Stale,
    /// The fetch failed; the previous products are kept.
    Failed,
}

/// Catalog browse state.
#[derive(Debug, Default)]
pub struct CatalogBrowser {
    selected: Category,
    products: Vec<Product>,
    categories: Vec<String>,
    generation: u64,
    loaded: bool,
    last_error: Option<String>,
}

impl CatalogBrowser {
    /// Create an empty browser with the `all` category selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected category.
    #[must_use]
    pub const fn selected(&self) -> &Category {
        &self.selected
    }

    /// Products from the last applied fetch.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Known category names for the menu.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Replace the known category names.
    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    /// Whether any fetch has been applied yet.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Message from the most recent failed fetch, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Select `category` and start a fetch for it.
    ///
    /// Any fetch started earlier becomes stale.
    pub fn begin_fetch(&mut self, category: Category) -> FetchTicket {
        self.generation += 1;
        self.selected = category.clone();
        debug!(generation = self.generation, %category, "Catalog fetch started");
        FetchTicket {
            generation: self.generation,
            category,
        }
    }

    /// Apply the result of the fetch identified by `ticket`.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Product>, CatalogError>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation || ticket.category != self.selected {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                category = %ticket.category,
                "Discarding stale catalog response"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(products) => {
                let count = products.len();
                self.products = products;
                self.loaded = true;
                self.last_error = None;
                FetchOutcome::Applied(count)
            }
            Err(e) => {
                warn!(error = %e, category = %ticket.category, "Catalog unavailable, keeping previous products");
                self.last_error = Some(e.to_string());
                FetchOutcome::Failed
            }
        }
    }

    /// Products whose title contains `query`, case-insensitively.
    ///
    /// Does not modify the stored catalog; an empty query returns everything.
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |product| product.title_matches(query))
    }

    /// Look up a product in the current catalog.
    #[must_use]
    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }
}
