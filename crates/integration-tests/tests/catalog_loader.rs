//! Integration tests for catalog loading through the shared browse state.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use fakestore_core::{Category, ProductId};
use fakestore_integration_tests::{app_state, hat, mock_catalog, shirt, test_config};
use fakestore_storefront::catalog::FetchOutcome;
use fakestore_storefront::state::AppState;
use fakestore_storefront::storage::MemoryStore;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_all_then_category_switch() {
    let server = mock_catalog().await;
    let state = app_state(&server, Arc::new(MemoryStore::new()));

    let outcome = state.refresh_catalog(Category::All).await;
    assert_eq!(outcome, FetchOutcome::Applied(3));

    let outcome = state.refresh_catalog(Category::parse("electronics")).await;
    assert_eq!(outcome, FetchOutcome::Applied(1));

    let catalog = state.catalog().lock().await;
    assert_eq!(catalog.selected(), &Category::parse("electronics"));
    assert_eq!(catalog.products()[0].title, "Portable SSD 1TB");
    assert!(catalog.find(ProductId::new(1)).is_none());
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_products() {
    let server = mock_catalog().await;
    Mock::given(method("GET"))
        .and(path("/products/category/jewelery"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let state = app_state(&server, Arc::new(MemoryStore::new()));

    state.refresh_catalog(Category::All).await;
    let outcome = state.refresh_catalog(Category::parse("jewelery")).await;
    assert_eq!(outcome, FetchOutcome::Failed);

    let catalog = state.catalog().lock().await;
    assert_eq!(catalog.products().len(), 3);
    assert!(catalog.last_error().is_some());
}

#[tokio::test]
async fn test_slow_category_times_out_and_keeps_products() {
    let server = mock_catalog().await;
    Mock::given(method("GET"))
        .and(path("/products/category/jewelery"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let mut config = test_config(&server.uri(), Path::new(".data"));
    config.catalog.timeout = Duration::from_secs(1);
    let state =
        AppState::new(config, Arc::new(MemoryStore::new())).expect("app state should build");

    assert_eq!(
        state.refresh_catalog(Category::All).await,
        FetchOutcome::Applied(3)
    );
    let outcome = tokio::time::timeout(
        Duration::from_secs(4),
        state.refresh_catalog(Category::parse("jewelery")),
    )
    .await
    .expect("catalog timeout should end the fetch");
    assert_eq!(outcome, FetchOutcome::Failed);

    let catalog = state.catalog().lock().await;
    assert_eq!(catalog.products().len(), 3);
    assert!(catalog.last_error().is_some());
}

#[tokio::test]
async fn test_malformed_entry_fails_whole_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            shirt(),
            {"id": 2, "title": "Hat", "image": "hat.png"}
        ])))
        .mount(&server)
        .await;
    let state = app_state(&server, Arc::new(MemoryStore::new()));

    let outcome = state.refresh_catalog(Category::All).await;
    assert_eq!(outcome, FetchOutcome::Failed);
    assert!(state.catalog().lock().await.products().is_empty());
}

#[tokio::test]
async fn test_slow_response_for_old_category_is_discarded() {
    let server = mock_catalog().await;
    Mock::given(method("GET"))
        .and(path("/products/category/jewelery"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([shirt(), hat()]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    let state = app_state(&server, Arc::new(MemoryStore::new()));

    let slow = state.refresh_catalog(Category::parse("jewelery"));
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        state.refresh_catalog(Category::parse("electronics")).await
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(slow, FetchOutcome::Stale);
    assert_eq!(fast, FetchOutcome::Applied(1));

    let catalog = state.catalog().lock().await;
    assert_eq!(catalog.selected(), &Category::parse("electronics"));
    assert_eq!(catalog.products().len(), 1);
}

#[tokio::test]
async fn test_categories_loaded_for_menu() {
    let server = mock_catalog().await;
    let state = app_state(&server, Arc::new(MemoryStore::new()));

    state.refresh_categories().await;

    assert_eq!(
        state.catalog().lock().await.categories(),
        ["electronics".to_string(), "men's clothing".to_string()]
    );
}
