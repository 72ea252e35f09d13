//! Cart store: the authoritative cart state for a widget session.
//!
//! [`CartStore`] wraps a [`Cart`] with two side effects that run after every
//! mutation, in order:
//!
//! 1. The line items are serialized into the `"cart"` storage slot.
//! 2. Every subscribed listener receives a fresh [`CartSummary`].
//!
//! Persistence is best-effort. Read failures at startup yield an empty cart
//! and write failures are logged; neither ever surfaces to the caller, and
//! the in-memory cart stays correct either way.
//!
//! The store is explicitly constructed and owned. The server keeps one behind
//! an async mutex in `AppState`; tests build as many isolated stores as they
//! like.

use std::fmt;
use std::sync::Arc;

use fakestore_core::{Cart, CartSummary, LineItem, Price, Product, ProductId};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Storage slot holding the serialized cart.
pub const CART_SLOT: &str = "cart";

/// Callback invoked with the new cart state after each mutation.
pub type CartListener = Box<dyn Fn(&CartSummary) + Send + Sync>;

/// Shopping cart with persistence and change notification.
pub struct CartStore {
    cart: Cart,
    storage: Arc<dyn KeyValueStore>,
    listeners: Vec<CartListener>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store by restoring the cart from `storage`.
    ///
    /// A missing, unreadable, or malformed slot yields an empty cart.
    #[must_use]
    pub fn restore(storage: Arc<dyn KeyValueStore>) -> Self {
        let cart = load_cart(storage.as_ref());
        Self {
            cart,
            storage,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for cart changes.
    ///
    /// Listeners run synchronously, in registration order, after the mutation
    /// has been applied and persisted.
    pub fn subscribe(&mut self, listener: impl Fn(&CartSummary) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Add one unit of `product`. Returns the product's new quantity.
    pub fn add_product(&mut self, product: Product) -> u32 {
        let product_id = product.id;
        let quantity = self.cart.add(product);
        debug!(%product_id, quantity, "Added product to cart");
        self.commit();
        quantity
    }

    /// Remove the line for `product_id`.
    ///
    /// Removing a product that is not in the cart is a no-op: nothing is
    /// persisted and no listener runs. Returns whether a line was removed.
    pub fn remove_product(&mut self, product_id: ProductId) -> bool {
        if self.cart.remove(product_id).is_none() {
            debug!(%product_id, "Remove ignored, product not in cart");
            return false;
        }
        debug!(%product_id, "Removed product from cart");
        self.commit();
        true
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        debug!("Cleared cart");
        self.commit();
    }

    /// Exact grand total, recomputed on every call.
    #[must_use]
    pub fn grand_total(&self) -> Price {
        self.cart.grand_total()
    }

    /// Whether `product_id` has a line in the cart.
    #[must_use]
    pub fn is_in_cart(&self, product_id: ProductId) -> bool {
        self.cart.contains(product_id)
    }

    /// Line items in insertion order.
    pub fn line_items(&self) -> impl ExactSizeIterator<Item = &LineItem> {
        self.cart.line_items()
    }

    /// Snapshot of the current cart for rendering.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    /// The underlying cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    fn commit(&self) {
        self.persist();
        if self.listeners.is_empty() {
            return;
        }
        let summary = self.cart.summary();
        for listener in &self.listeners {
            listener(&summary);
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.cart) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart, skipping persistence");
                return;
            }
        };
        if let Err(e) = self.storage.set(CART_SLOT, &json) {
            warn!(error = %e, "Failed to persist cart, keeping in-memory state");
        }
    }
}

/// Read and decode the cart slot, falling back to an empty cart.
fn load_cart(storage: &dyn KeyValueStore) -> Cart {
    let raw = match storage.get(CART_SLOT) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No persisted cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            warn!(error = %e, "Failed to read persisted cart, starting empty");
            return Cart::new();
        }
    };

    // Browser storage writes the literal "null" for a never-saved cart
    match serde_json::from_str::<Option<Cart>>(&raw) {
        Ok(cart) => {
            let cart = cart.unwrap_or_default();
            debug!(lines = cart.len(), "Restored persisted cart");
            cart
        }
        Err(e) => {
            warn!(error = %e, "Persisted cart is malformed, starting empty");
            Cart::new()
        }
    }
}
