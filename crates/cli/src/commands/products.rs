//! Catalog commands.
//!
//! # Environment Variables
//!
//! - `SANITY_PROJECT_ID` - Sanity project hosting the catalog (required)
//! - `SANITY_DATASET`, `SANITY_API_VERSION`, `SANITY_USE_CDN`, `SANITY_API_URL`, `SANITY_TOKEN`

use std::path::Path;

use hekto_core::{CartError, ProductId, ProductTag};
use hekto_storefront::catalog::{CatalogClient, CatalogError};
use hekto_storefront::config::{ConfigError, SanityConfig};
use hekto_storefront::routes::cart::CartView;
use serde::Serialize;
use thiserror::Error;

use super::print_json;

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum ProductsError {
    /// Catalog configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog query failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The cart rejected the change.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Output could not be written.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

fn client() -> Result<CatalogClient, ProductsError> {
    let config = SanityConfig::from_env()?;
    Ok(CatalogClient::new(&config)?)
}

/// List every product.
pub async fn list() -> Result<(), ProductsError> {
    let products = client()?.products().await?;
    tracing::info!("Found {} products", products.len());
    print_json(&products)?;
    Ok(())
}

/// Show one product.
pub async fn show(id: &ProductId) -> Result<(), ProductsError> {
    let product = client()?.product(id).await?;
    print_json(&product)?;
    Ok(())
}

/// Add a snapshot of a catalog product to the cart.
pub async fn add(data_dir: &Path, id: &ProductId, quantity: u32) -> Result<(), ProductsError> {
    let product = client()?.product(id).await?;

    let mut store = super::cart::mount(data_dir).await;
    let cart = store.add(product.snapshot(), quantity).await?;
    print_json(&CartView::from(cart))?;
    Ok(())
}

/// List one "latest products" tab.
pub async fn latest(tag: ProductTag) -> Result<(), ProductsError> {
    let products = client()?.products_tagged(tag).await?;
    print_json(&products)?;
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    category: &'a str,
    id: &'a str,
    title: &'a str,
}

/// One product per category.
pub async fn categories() -> Result<(), ProductsError> {
    let picked = client()?.top_categories().await?;
    let rows: Vec<CategoryRow<'_>> = picked
        .iter()
        .map(|(category, product)| CategoryRow {
            category,
            id: product.id.as_str(),
            title: &product.title,
        })
        .collect();
    print_json(&rows)?;
    Ok(())
}
