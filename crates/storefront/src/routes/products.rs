//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use hekto_core::{Product, ProductId, ProductTag};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{instrument, warn};

use super::cart::{CartView, mount};
use crate::catalog::CatalogError;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Home page "latest products" tabs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestProducts {
    pub new_arrival: Vec<Product>,
    pub best_seller: Vec<Product>,
    pub trending: Vec<Product>,
    pub featured: Vec<Product>,
}

/// One top-category tile.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub category: String,
    pub product: Product,
}

/// Add-to-cart body.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartRequest {
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Catalog listings degrade to an empty list rather than an error page.
fn or_empty<T>(result: std::result::Result<Vec<T>, CatalogError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to fetch {what}");
        Vec::new()
    })
}

/// Any failure to fetch a single product shows the not-found state.
fn or_not_found(
    result: std::result::Result<Product, CatalogError>,
    id: &ProductId,
) -> Result<Product> {
    result.map_err(|e| {
        if !matches!(e, CatalogError::NotFound(_)) {
            warn!(error = %e, "Failed to fetch product");
        }
        AppError::NotFound(format!("Product not found: {id}"))
    })
}

/// Display product listing (shop grid).
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(or_empty(state.catalog().products().await, "products"))
}

/// Display the latest products tabs.
#[instrument(skip(state))]
pub async fn latest(State(state): State<AppState>) -> Json<LatestProducts> {
    let catalog = state.catalog();
    let (new_arrival, best_seller, trending, featured) = tokio::join!(
        catalog.products_tagged(ProductTag::NewArrival),
        catalog.products_tagged(ProductTag::BestSeller),
        catalog.products_tagged(ProductTag::Trending),
        catalog.products_tagged(ProductTag::Featured),
    );

    Json(LatestProducts {
        new_arrival: or_empty(new_arrival, "new arrivals"),
        best_seller: or_empty(best_seller, "best sellers"),
        trending: or_empty(trending, "trending products"),
        featured: or_empty(featured, "featured products"),
    })
}

/// Display one product per category.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<CategoryView>> {
    let picked = or_empty(state.catalog().top_categories().await, "top categories");
    Json(
        picked
            .into_iter()
            .map(|(category, product)| CategoryView { category, product })
            .collect(),
    )
}

/// Display product detail.
#[instrument(skip(state), fields(id = %id))]
pub async fn show(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Json<Product>> {
    let product = or_not_found(state.catalog().product(&id).await, &id)?;
    Ok(Json(product))
}

/// Add a snapshot of the product to the cart.
#[instrument(skip(state, session, request), fields(id = %id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = or_not_found(state.catalog().product(&id).await, &id)?;

    let mut store = mount(session).await;
    let cart = store
        .add(product.snapshot(), request.quantity.unwrap_or(1))
        .await?;

    Ok(Json(CartView::from(cart)))
}
