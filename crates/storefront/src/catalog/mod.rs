//! Catalog loader for the remote product API.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`; one attempt per call, no automatic retry
//! - Every entry is validated into a [`Product`]; one bad entry fails the
//!   whole response rather than showing a partial catalog
//! - Successful responses are cached in memory via `moka` (TTL from config,
//!   disabled when the TTL is zero); failures are never cached
//!
//! # Endpoints
//!
//! ```text
//! GET {base}/products                     - full catalog
//! GET {base}/products/category/{name}     - one category (name percent-encoded)
//! GET {base}/products/categories          - category names
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use fakestore_core::Category;
//! use fakestore_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let products = client.fetch_catalog(&Category::parse("electronics")).await?;
//! ```

mod browser;
mod cache;

pub use browser::{CatalogBrowser, FetchOutcome, FetchTicket};

use std::sync::Arc;

use fakestore_core::{Category, Product};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::CatalogConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when loading the catalog.
///
/// Every variant means the catalog is unavailable for this call; callers
/// keep whatever they were showing before.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request could not be sent or the response body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status}")]
    Status { status: u16 },

    /// Response body is not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry is missing a required field or has an invalid value.
    #[error("Invalid product at index {index}: {reason}")]
    InvalidProduct { index: usize, reason: String },
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote catalog API.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("fakestore-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(100)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// URL listing the products for `category`.
    #[must_use]
    pub fn products_url(&self, category: &Category) -> String {
        match category.name() {
            None => format!("{}/products", self.inner.base_url),
            Some(name) => format!(
                "{}/products/category/{}",
                self.inner.base_url,
                urlencoding::encode(name)
            ),
        }
    }

    /// GET a URL and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Fetch the products in `category`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or if any
    /// entry lacks `id`, `title`, `price`, or `image` (or has a negative price).
    #[instrument(skip(self), fields(category = %category))]
    pub async fn fetch_catalog(&self, category: &Category) -> Result<Vec<Product>, CatalogError> {
        let key = CacheKey::Products(category.clone());

        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Products(products)) = cache.get(&key).await
        {
            debug!("Cache hit for catalog");
            return Ok(products.as_ref().clone());
        }

        let url = self.products_url(category);
        let entries: Vec<serde_json::Value> = self.get_json(&url).await?;
        let products = parse_products(entries)?;
        debug!(count = products.len(), "Fetched catalog");

        if let Some(cache) = &self.inner.cache {
            cache
                .insert(key, CacheValue::Products(Arc::new(products.clone())))
                .await;
        }

        Ok(products)
    }

    /// Fetch the list of category names.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or if the
    /// body is not a JSON array of strings.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Categories(categories)) = cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories.as_ref().clone());
        }

        let url = format!("{}/products/categories", self.inner.base_url);
        let categories: Vec<String> = self.get_json(&url).await?;

        if let Some(cache) = &self.inner.cache {
            cache
                .insert(
                    CacheKey::Categories,
                    CacheValue::Categories(Arc::new(categories.clone())),
                )
                .await;
        }

        Ok(categories)
    }
}

/// Validate raw catalog entries into products.
fn parse_products(entries: Vec<serde_json::Value>) -> Result<Vec<Product>, CatalogError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<Product>(entry).map_err(|e| CatalogError::InvalidProduct {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}
