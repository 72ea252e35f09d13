//! Integration tests for Fakestore.
//!
//! Every test runs against a `wiremock` stand-in for the catalog API, so no
//! network access is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fakestore-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_loader` - Catalog fetches, category switches, stale results
//! - `cart_persistence` - Cart slot format and restart round-trips
//! - `storefront_routes` - HTMX pages and fragments through the full router

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header::CONTENT_TYPE},
};
use fakestore_storefront::config::StorefrontConfig;
use fakestore_storefront::state::AppState;
use fakestore_storefront::storage::KeyValueStore;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Shirt, $19.99, men's clothing.
#[must_use]
pub fn shirt() -> Value {
    json!({
        "id": 1,
        "title": "Shirt",
        "price": 19.99,
        "image": "https://img.test/shirt.png",
        "category": "men's clothing"
    })
}

/// Hat, $9.50, men's clothing.
#[must_use]
pub fn hat() -> Value {
    json!({
        "id": 2,
        "title": "Hat",
        "price": 9.5,
        "image": "https://img.test/hat.png",
        "category": "men's clothing"
    })
}

/// Portable SSD, $109.00, electronics.
#[must_use]
pub fn ssd() -> Value {
    json!({
        "id": 9,
        "title": "Portable SSD 1TB",
        "price": 109,
        "image": "https://img.test/ssd.png",
        "category": "electronics"
    })
}

/// Start a catalog server with the full catalog, the electronics category
/// and the category list.
pub async fn mock_catalog() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([shirt(), hat(), ssd()])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products/category/electronics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ssd()])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["electronics", "men's clothing"])),
        )
        .mount(&server)
        .await;

    server
}

/// Storefront configuration pointing at `catalog_url`, with caching off.
///
/// # Panics
///
/// Panics if the URL is not a valid http(s) URL.
#[must_use]
pub fn test_config(catalog_url: &str, data_dir: &Path) -> StorefrontConfig {
    let data_dir = data_dir.display().to_string();
    StorefrontConfig::from_lookup(|key| match key {
        "CATALOG_API_URL" => Some(catalog_url.to_string()),
        "CATALOG_CACHE_TTL_SECS" => Some("0".to_string()),
        "CATALOG_TIMEOUT_SECS" => Some("5".to_string()),
        "STOREFRONT_DATA_DIR" => Some(data_dir.clone()),
        _ => None,
    })
    .expect("test configuration should be valid")
}

/// Build application state against `catalog` backed by `storage`.
///
/// # Panics
///
/// Panics if the catalog client cannot be built.
#[must_use]
pub fn app_state(catalog: &MockServer, storage: Arc<dyn KeyValueStore>) -> AppState {
    let config = test_config(&catalog.uri(), Path::new(".data"));
    AppState::new(config, storage).expect("app state should build")
}

/// A response reduced to what the assertions need.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Send one request through the router.
///
/// # Panics
///
/// Panics if the router fails or the body is not UTF-8.
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).expect("body should be UTF-8"),
    }
}

/// `GET uri`.
///
/// # Panics
///
/// Panics if `uri` is invalid.
#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

/// `POST uri` with a form-encoded body.
///
/// # Panics
///
/// Panics if `uri` is invalid.
#[must_use]
pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request should build")
}
