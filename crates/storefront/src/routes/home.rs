//! Widget page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::routes::cart::CartView;
use crate::routes::products::{BrowseQuery, ProductGridView, browse};
use crate::state::AppState;

/// Full widget page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub grid: ProductGridView,
    pub cart: CartView,
}

/// Display the widget page.
///
/// Loads the category menu on first visit; the grid itself is built by the
/// same browse logic the `/products` fragment uses.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> impl IntoResponse {
    let needs_categories = state.catalog().lock().await.categories().is_empty();
    if needs_categories {
        state.refresh_categories().await;
    }

    let grid = browse(&state, &query).await;
    let cart = {
        let updates = state.cart_updates();
        let summary = updates.borrow();
        CartView::from(&*summary)
    };

    IndexTemplate { grid, cart }
}
