//! Integration tests for the storefront router: pages, HTMX fragments and
//! cart mutations, driven in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::http::StatusCode;
use fakestore_core::Category;
use fakestore_integration_tests::{app_state, get, mock_catalog, post_form, send};
use fakestore_storefront::routes;
use fakestore_storefront::state::AppState;
use fakestore_storefront::storage::{FileStore, MemoryStore};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn loaded_state() -> (MockServer, AppState) {
    let server = mock_catalog().await;
    let state = app_state(&server, Arc::new(MemoryStore::new()));
    state.refresh_catalog(Category::All).await;
    (server, state)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let server = mock_catalog().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let state = app_state(&server, Arc::new(FileStore::new(dir.path().join("data"))));
    let app = routes::app(state);

    let resp = send(&app, get("/health")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");

    let resp = send(&app, get("/health/ready")).await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let (_server, state) = loaded_state().await;
    let app = routes::app(state);

    let resp = send(&app, get("/cart/count")).await;
    assert!(resp.headers.contains_key("x-request-id"));
    assert_eq!(resp.headers["x-frame-options"], "DENY");
    assert!(resp.headers.contains_key("content-security-policy"));
}

// ============================================================================
// Page & Product Grid
// ============================================================================

#[tokio::test]
async fn test_index_renders_menu_grid_and_empty_cart() {
    let server = mock_catalog().await;
    let state = app_state(&server, Arc::new(MemoryStore::new()));
    let app = routes::app(state);

    let resp = send(&app, get("/")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("All Categories"));
    assert!(resp.body.contains("electronics"));
    assert!(resp.body.contains("Shirt"));
    assert!(resp.body.contains("$19.99"));
    assert!(resp.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_category_switch_and_search() {
    let (_server, state) = loaded_state().await;
    let app = routes::app(state);

    let resp = send(&app, get("/products?category=electronics")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Portable SSD 1TB"));
    assert!(!resp.body.contains("Shirt"));

    let resp = send(&app, get("/products?category=all&q=HAT")).await;
    assert!(resp.body.contains("Hat"));
    assert!(!resp.body.contains("Shirt"));
    assert!(!resp.body.contains("Portable SSD 1TB"));
}

#[tokio::test]
async fn test_catalog_outage_renders_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let app = routes::app(app_state(&server, Arc::new(MemoryStore::new())));

    let resp = send(&app, get("/products")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("The catalog is unavailable right now."));
    assert!(resp.body.contains("No products found."));
}

// ============================================================================
// Cart Fragments
// ============================================================================

#[tokio::test]
async fn test_cart_worked_example() {
    let (_server, state) = loaded_state().await;
    let app = routes::app(state);

    send(&app, post_form("/cart/add", "product_id=1")).await;
    send(&app, post_form("/cart/add", "product_id=1")).await;
    let resp = send(&app, post_form("/cart/add", "product_id=2")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.headers["hx-trigger"], "cart-updated");
    assert!(resp.body.contains("$49.48"));

    let resp = send(&app, get("/cart/count")).await;
    assert!(resp.body.contains(">3</span>"));

    let resp = send(&app, post_form("/cart/remove", "product_id=2")).await;
    assert!(resp.body.contains("$39.98"));
    assert!(!resp.body.contains("Hat"));

    let resp = send(&app, post_form("/cart/clear", "")).await;
    assert_eq!(resp.headers["hx-trigger"], "cart-updated");
    assert!(resp.body.contains("Your cart is empty."));

    let resp = send(&app, get("/cart/count")).await;
    assert!(resp.body.contains(">0</span>"));
}

#[tokio::test]
async fn test_grid_marks_products_in_cart() {
    let (_server, state) = loaded_state().await;
    let app = routes::app(state);

    send(&app, post_form("/cart/add", "product_id=1")).await;
    send(&app, post_form("/cart/add", "product_id=1")).await;

    let resp = send(&app, get("/products")).await;
    assert!(resp.body.contains("In Cart (2)"));
    assert!(resp.body.contains("Add to Cart"));
}

#[tokio::test]
async fn test_remove_absent_product_is_noop() {
    let (_server, state) = loaded_state().await;
    let app = routes::app(state.clone());

    send(&app, post_form("/cart/add", "product_id=1")).await;
    let resp = send(&app, post_form("/cart/remove", "product_id=2")).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("$19.99"));
    assert_eq!(state.cart_updates().borrow().item_count, 1);
}

#[tokio::test]
async fn test_add_rejects_unknown_and_invalid_ids() {
    let (_server, state) = loaded_state().await;
    let app = routes::app(state.clone());

    let resp = send(&app, post_form("/cart/add", "product_id=999")).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = send(&app, post_form("/cart/add", "product_id=abc")).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    assert!(state.cart_updates().borrow().is_empty());
}

#[tokio::test]
async fn test_cart_survives_new_app_state() {
    let server = mock_catalog().await;
    let dir = tempfile::tempdir().expect("tempdir");

    let state = app_state(&server, Arc::new(FileStore::new(dir.path())));
    state.refresh_catalog(Category::All).await;
    let app = routes::app(state);
    send(&app, post_form("/cart/add", "product_id=9")).await;

    let restarted = routes::app(app_state(&server, Arc::new(FileStore::new(dir.path()))));
    let resp = send(&restarted, get("/cart")).await;
    assert!(resp.body.contains("Portable SSD 1TB"));
    assert!(resp.body.contains("$109.00"));
}
