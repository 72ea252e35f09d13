//! HTTP route handlers for the storefront widget.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Full page: category menu, search, grid, cart
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (cart storage writable)
//!
//! # Products (HTMX fragments)
//! GET  /products?category=&q=  - Product grid fragment
//!
//! # Cart (HTMX fragments, mutations send `HX-Trigger: cart-updated`)
//! GET  /cart                   - Cart summary fragment
//! POST /cart/add               - Add one unit (form: product_id)
//! POST /cart/remove            - Remove a line (form: product_id)
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge fragment
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(products::grid))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all page and fragment routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
}

/// Build the complete application: routes, health checks, static files and
/// the middleware stack.
///
/// Sentry layers are added by the binary so tests can drive this router
/// without a Sentry client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the cart cannot be persisted.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.storage().check_ready() {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Cart storage is not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
