//! Shipping rate commands.
//!
//! # Environment Variables
//!
//! - `SHIPMENT_RATES_URL` - Endpoint that quotes shipping rates (required)

use hekto_core::ShippingAddress;
use hekto_storefront::config::{ConfigError, ShipmentConfig};
use hekto_storefront::shipment::{ShipmentClient, ShipmentView};
use thiserror::Error;

use super::print_json;

/// Errors that can occur during shipment commands.
#[derive(Debug, Error)]
pub enum ShipmentCommandError {
    /// Rate endpoint configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The address is incomplete.
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] hekto_core::AddressError),

    /// Output could not be written.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Quote rates for an address. A failed lookup prints the no-rates panel.
pub async fn rates(address: &ShippingAddress) -> Result<(), ShipmentCommandError> {
    address.validate()?;

    let client = ShipmentClient::new(&ShipmentConfig::from_env()?);
    let view = ShipmentView::from_result(client.rates(address).await);
    print_json(&view)?;
    Ok(())
}
