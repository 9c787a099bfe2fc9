//! Product catalog client for the Sanity content API.
//!
//! # Architecture
//!
//! - GROQ queries over the HTTP query endpoint, made with `reqwest` directly
//! - The catalog is the source of truth - NO local sync, read-only queries
//! - In-memory caching via `moka` for query results (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use hekto_storefront::catalog::CatalogClient;
//!
//! let catalog = CatalogClient::new(&config.sanity)?;
//!
//! let products = catalog.products().await?;
//! let product = catalog.product(&products[0].id).await?;
//! ```

mod cache;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use hekto_core::{Product, ProductId, ProductTag, top_categories};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::SanityConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API rejected the query.
    #[error("Catalog API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the API, or a truncated body.
        message: String,
    },

    /// The endpoint URL could not be built.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Envelope of a successful query response.
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Envelope of a failed query response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for catalog queries.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured host does not form a valid URL.
    pub fn new(config: &SanityConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                endpoint: config.query_url()?,
                token: config.token.clone(),
                cache,
            }),
        })
    }

    /// Run a GROQ query and decode its `result`.
    async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, Value)],
    ) -> Result<T, CatalogError> {
        let url = build_query_url(&self.inner.endpoint, groq, params)?;

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&response_text);
            tracing::error!(
                status = %status,
                message = %message,
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response: QueryResponse<T> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;

        Ok(response.result)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get every product, for the shop grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.query(&queries::all_products(), &[]).await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its document id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Option<Product> = self
            .query(
                &queries::product_by_id(),
                &[("id", Value::from(id.as_str()))],
            )
            .await?;

        let product =
            product.ok_or_else(|| CatalogError::NotFound(format!("Product not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the products for one "latest products" tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products_tagged(&self, tag: ProductTag) -> Result<Vec<Product>, CatalogError> {
        let cache_key = CacheKey::Tagged(tag);

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for tagged products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .query(
                &queries::products_tagged(tag),
                &[("tag", Value::from(tag.as_str()))],
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// One representative product per category, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn top_categories(&self) -> Result<Vec<(String, Product)>, CatalogError> {
        let products = self.products().await?;
        Ok(top_categories(&products))
    }
}

/// Build the query URL: the GROQ text plus each parameter as `$name=<json>`.
fn build_query_url(
    endpoint: &Url,
    groq: &str,
    params: &[(&str, Value)],
) -> Result<Url, CatalogError> {
    let mut url = endpoint.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("query", groq);
        for (name, value) in params {
            pairs.append_pair(&format!("${name}"), &serde_json::to_string(value)?);
        }
    }
    Ok(url)
}

/// Extract a readable message from an error body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error }) => match (error.kind, error.description) {
            (Some(kind), Some(description)) => format!("{kind}: {description}"),
            (None, Some(description)) => description,
            (Some(kind), None) => kind,
            (None, None) => "(no error details provided)".to_string(),
        },
        Err(_) => body.chars().take(200).collect(),
    }
}
