//! Application state shared across handlers.

use std::sync::Arc;

use fakestore_core::{CartSummary, Category};
use tokio::sync::{Mutex, watch};

use crate::cart::CartStore;
use crate::catalog::{CatalogBrowser, CatalogClient, CatalogError, FetchOutcome};
use crate::config::StorefrontConfig;
use crate::storage::KeyValueStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the single cart for
/// this process and the catalog browse state; each sits behind its own async
/// mutex so a cart mutation always runs to completion before the next one.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog_client: CatalogClient,
    catalog: Mutex<CatalogBrowser>,
    cart: Mutex<CartStore>,
    cart_updates: watch::Receiver<CartSummary>,
    storage: Arc<dyn KeyValueStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Restores the cart from `storage` and wires its change notifications
    /// into a watch channel that the cart fragments render from.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CatalogError> {
        let catalog_client = CatalogClient::new(&config.catalog)?;

        let mut cart = CartStore::restore(storage.clone());
        let (tx, cart_updates) = watch::channel(cart.summary());
        cart.subscribe(move |summary| {
            tx.send_replace(summary.clone());
        });

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog_client,
                catalog: Mutex::new(CatalogBrowser::new()),
                cart: Mutex::new(cart),
                cart_updates,
                storage,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog_client(&self) -> &CatalogClient {
        &self.inner.catalog_client
    }

    /// Catalog browse state.
    #[must_use]
    pub fn catalog(&self) -> &Mutex<CatalogBrowser> {
        &self.inner.catalog
    }

    /// The cart store.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartStore> {
        &self.inner.cart
    }

    /// Latest cart summary, updated after every cart mutation.
    #[must_use]
    pub fn cart_updates(&self) -> watch::Receiver<CartSummary> {
        self.inner.cart_updates.clone()
    }

    /// The key-value store backing the cart.
    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.inner.storage.as_ref()
    }

    /// Select `category` and fetch its products.
    ///
    /// The browse lock is released while the request is in flight. If another
    /// fetch starts in the meantime, this result is discarded.
    pub async fn refresh_catalog(&self, category: Category) -> FetchOutcome {
        let ticket = self.inner.catalog.lock().await.begin_fetch(category);
        let result = self
            .inner
            .catalog_client
            .fetch_catalog(ticket.category())
            .await;
        let outcome = self.inner.catalog.lock().await.complete_fetch(&ticket, result);
        tracing::info!(category = %ticket.category(), ?outcome, "Catalog refresh finished");
        outcome
    }

    /// Fetch category names for the menu; failures leave the menu as it was.
    pub async fn refresh_categories(&self) {
        match self.inner.catalog_client.fetch_categories().await {
            Ok(categories) => self.inner.catalog.lock().await.set_categories(categories),
            Err(e) => tracing::warn!(error = %e, "Failed to load categories"),
        }
    }
}
