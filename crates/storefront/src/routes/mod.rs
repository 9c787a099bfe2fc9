//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Health check
//!
//! # Products
//! GET    /products                   - Product listing (shop grid)
//! GET    /products/latest            - Latest products tabs
//! GET    /products/categories        - One product per category
//! GET    /products/{id}              - Product detail
//! POST   /products/{id}/cart         - Add product snapshot to cart
//!
//! # Cart
//! GET    /cart                       - Cart contents and subtotal
//! POST   /cart/items                 - Add explicit line item
//! POST   /cart/items/{id}/increment  - Quantity +1
//! POST   /cart/items/{id}/decrement  - Quantity -1 (removes at zero)
//! DELETE /cart/items/{id}            - Remove line
//! GET    /cart/count                 - Cart count badge
//!
//! # Shipment
//! GET    /shipment                   - Checkout with empty rate panel
//! POST   /shipment/rates             - Look up rates for an address
//! ```

pub mod cart;
pub mod products;
pub mod shipment;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/latest", get(products::latest))
        .route("/categories", get(products::categories))
        .route("/{id}", get(products::show))
        .route("/{id}/cart", post(products::add_to_cart))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{id}", axum::routing::delete(cart::remove))
        .route("/items/{id}/increment", post(cart::increment))
        .route("/items/{id}/decrement", post(cart::decrement))
        .route("/count", get(cart::count))
}

/// Create the shipment routes router.
pub fn shipment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shipment::show))
        .route("/rates", post(shipment::rates))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/shipment", shipment_routes())
}

/// Build the full application with session and tracing layers applied.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    routes()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog.
async fn health() -> &'static str {
    "ok"
}
