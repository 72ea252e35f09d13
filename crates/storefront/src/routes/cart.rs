//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation goes through the shared `CartStore`; the rendered summary
//! comes from the store's change notification rather than from the handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use fakestore_core::{CartSummary, LineSummary, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: i64,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub grand_total: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&CartSummary::default())
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartSummary> for CartView {
    fn from(summary: &CartSummary) -> Self {
        Self {
            lines: summary.lines.iter().map(CartLineView::from).collect(),
            grand_total: summary.grand_total.to_string(),
            item_count: summary.item_count,
        }
    }
}

impl From<&LineSummary> for CartLineView {
    fn from(line: &LineSummary) -> Self {
        Self {
            product_id: line.product_id.as_i64(),
            title: line.title.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            line_total: line.line_total.to_string(),
        }
    }
}

/// Add/remove form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: String,
}

impl CartItemForm {
    fn product_id(&self) -> Result<ProductId> {
        self.product_id
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid product id: {}", self.product_id)))
    }
}

/// Cart summary fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_summary.html")]
pub struct CartSummaryTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Latest summary published by the cart store.
fn current_cart(state: &AppState) -> CartView {
    let updates = state.cart_updates();
    let summary = updates.borrow();
    CartView::from(&*summary)
}

/// Render the summary with an HTMX trigger so other fragments refresh.
fn cart_updated(state: &AppState) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartSummaryTemplate {
            cart: current_cart(state),
        },
    )
        .into_response()
}

/// Display cart summary fragment.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    CartSummaryTemplate {
        cart: current_cart(&state),
    }
}

/// Add one unit of a product from the current catalog (HTMX).
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let product_id = form.product_id()?;

    let product = state
        .catalog()
        .lock()
        .await
        .find(product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let quantity = state.cart().lock().await.add_product(product).to_string();
    let product_id = product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[("product_id", product_id.as_str()), ("quantity", quantity.as_str())]),
    );

    Ok(cart_updated(&state))
}

/// Remove a line from the cart (HTMX).
///
/// Removing a product that is not in the cart succeeds without changes.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let product_id = form.product_id()?;

    let removed = state.cart().lock().await.remove_product(product_id);
    if removed {
        let product_id = product_id.to_string();
        add_breadcrumb(
            "cart",
            "Removed product",
            Some(&[("product_id", product_id.as_str())]),
        );
    }

    Ok(cart_updated(&state))
}

/// Empty the cart (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Response {
    state.cart().lock().await.clear();
    add_breadcrumb("cart", "Cleared cart", None);
    cart_updated(&state)
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.cart_updates().borrow().item_count;
    CartCountTemplate { count }
}
