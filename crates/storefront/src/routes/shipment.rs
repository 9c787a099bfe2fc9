//! Shipment (checkout) route handlers.

use axum::{Json, extract::State};
use hekto_core::ShippingAddress;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{CartView, mount};
use crate::error::{AppError, Result};
use crate::shipment::ShipmentView;
use crate::state::AppState;

/// Checkout page data: the cart beside the shipment panel.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub cart: CartView,
    pub shipment: ShipmentView,
}

/// Display checkout before any rate lookup.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CheckoutView> {
    let store = mount(session).await;
    Json(CheckoutView {
        cart: CartView::from(store.cart()),
        shipment: ShipmentView::idle(),
    })
}

/// Submit the address form and look up shipping rates.
#[instrument(skip(state, session, address))]
pub async fn rates(
    State(state): State<AppState>,
    session: Session,
    Json(address): Json<ShippingAddress>,
) -> Result<Json<CheckoutView>> {
    address
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let store = mount(session).await;
    let shipment = ShipmentView::from_result(state.shipment().rates(&address).await);

    Ok(Json(CheckoutView {
        cart: CartView::from(store.cart()),
        shipment,
    }))
}
