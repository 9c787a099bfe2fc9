//! Cart route handlers.
//!
//! Each request is one page mount: the cart is loaded from the visitor's
//! session, mutated, and written back before the response is built. Mutating
//! an id that is not in the cart is a no-op and returns the cart unchanged.

use axum::{
    Json,
    extract::Path,
};
use hekto_core::{Cart, CartLineItem, CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_sessions::Session;
use tracing::{debug, instrument};

use crate::cart::CartStore;
use crate::error::Result;
use crate::storage::SessionStorage;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Every other field snapshotted from the catalog record.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Format an amount as a price string, rounded for display.
fn format_price(amount: Decimal) -> String {
    Price::new(amount, CurrencyCode::default()).display()
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: format_price(cart.total()),
            item_count: cart.item_count(),
        }
    }
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            id: line.id.to_string(),
            title: line.title.clone(),
            quantity: line.quantity,
            price: format_price(line.price),
            line_price: format_price(line.line_total()),
            image_url: line
                .extra
                .get("imageUrl")
                .and_then(Value::as_str)
                .map(String::from),
            extra: line.extra.clone(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the visitor's cart from their session.
pub(crate) async fn mount(session: Session) -> CartStore<SessionStorage> {
    CartStore::load(SessionStorage::new(session)).await
}

/// Explicit line item to add.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub quantity: Option<u32>,
    /// Any other snapshot field, kept verbatim on the line.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Display cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let store = mount(session).await;
    Json(CartView::from(store.cart()))
}

/// Add a line item to the cart.
#[instrument(skip(session, request), fields(id = %request.id))]
pub async fn add(session: Session, Json(request): Json<AddItemRequest>) -> Result<Json<CartView>> {
    let mut store = mount(session).await;

    let item = CartLineItem {
        id: request.id,
        title: request.title,
        price: request.price,
        quantity: 1,
        extra: request.extra,
    };
    let cart = store.add(item, request.quantity.unwrap_or(1)).await?;

    Ok(Json(CartView::from(cart)))
}

/// Increase a line's quantity by one.
#[instrument(skip(session), fields(id = %id))]
pub async fn increment(session: Session, Path(id): Path<ProductId>) -> Json<CartView> {
    let mut store = mount(session).await;
    if !store.increment(&id).await {
        debug!("Increment of absent cart line ignored");
    }
    Json(CartView::from(store.cart()))
}

/// Decrease a line's quantity by one, removing it when it reaches zero.
#[instrument(skip(session), fields(id = %id))]
pub async fn decrement(session: Session, Path(id): Path<ProductId>) -> Json<CartView> {
    let mut store = mount(session).await;
    if !store.decrement(&id).await {
        debug!("Decrement of absent cart line ignored");
    }
    Json(CartView::from(store.cart()))
}

/// Remove a line from the cart.
#[instrument(skip(session), fields(id = %id))]
pub async fn remove(session: Session, Path(id): Path<ProductId>) -> Json<CartView> {
    let mut store = mount(session).await;
    if !store.delete(&id).await {
        debug!("Delete of absent cart line ignored");
    }
    Json(CartView::from(store.cart()))
}

/// Get cart item count (for the header badge).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCount> {
    let store = mount(session).await;
    Json(CartCount {
        count: store.item_count(),
    })
}
