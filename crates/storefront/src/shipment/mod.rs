//! Shipping-rate lookup.
//!
//! The rate endpoint takes a destination address and answers with zero or
//! more quotes. There are no retries and no client-side timeout; a failed
//! lookup simply shows no rates.

use std::sync::Arc;

use hekto_core::{AddressError, CurrencyCode, RateOffer, RateOfferId, ShippingAddress};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ShipmentConfig;

/// Shown whenever a lookup fails or yields nothing.
pub const NO_RATES_MESSAGE: &str = "No shipping rates available";

/// Errors that can occur when requesting rates.
#[derive(Debug, Error)]
pub enum ShipmentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint answered with a non-success status.
    #[error("Rate API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        message: String,
    },

    /// The address failed validation before any request was made.
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
}

/// Rate endpoint response. A missing `rates` field means no offers.
#[derive(Debug, Default, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: Option<Vec<WireRate>>,
}

#[derive(Debug, Deserialize)]
struct WireRate {
    #[serde(default)]
    object_id: String,
    #[serde(default)]
    provider: String,
    #[serde(default)]
    servicelevel: ServiceLevel,
    /// Minor units, as a decimal string.
    #[serde(default)]
    amount: String,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceLevel {
    #[serde(default)]
    name: String,
}

impl WireRate {
    fn into_offer(self) -> Option<RateOffer> {
        let Ok(id) = RateOfferId::parse(&self.object_id) else {
            warn!(provider = %self.provider, "Skipping rate without object_id");
            return None;
        };

        let Ok(amount_minor) = self.amount.trim().parse::<i64>() else {
            warn!(id = %id, amount = %self.amount, "Skipping rate with unparseable amount");
            return None;
        };

        Some(RateOffer {
            id,
            provider: self.provider,
            service_level: self.servicelevel.name,
            amount_minor,
            currency_code: CurrencyCode::default(),
        })
    }
}

// =============================================================================
// ShipmentClient
// =============================================================================

/// Client for the shipping-rate endpoint.
#[derive(Clone)]
pub struct ShipmentClient {
    inner: Arc<ShipmentClientInner>,
}

struct ShipmentClientInner {
    client: reqwest::Client,
    rates_url: Url,
}

impl ShipmentClient {
    #[must_use]
    pub fn new(config: &ShipmentConfig) -> Self {
        Self {
            inner: Arc::new(ShipmentClientInner {
                client: reqwest::Client::new(),
                rates_url: config.rates_url.clone(),
            }),
        }
    }

    /// Request rate quotes for an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is incomplete, the request fails, or
    /// the response cannot be parsed.
    #[instrument(skip(self, address), fields(city = %address.city, country = %address.country))]
    pub async fn rates(&self, address: &ShippingAddress) -> Result<Vec<RateOffer>, ShipmentError> {
        address.validate()?;

        let response = self
            .inner
            .client
            .post(self.inner.rates_url.clone())
            .json(address)
            .send()
            .await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Rate API returned non-success status"
            );
            return Err(ShipmentError::Api {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        let offers = parse_rates(&response_text)?;
        debug!(count = offers.len(), "Received shipping rates");
        Ok(offers)
    }
}

/// Decode a rate endpoint body into offers, skipping unusable entries.
fn parse_rates(body: &str) -> Result<Vec<RateOffer>, serde_json::Error> {
    let response: RatesResponse = serde_json::from_str(body)?;
    Ok(response
        .rates
        .unwrap_or_default()
        .into_iter()
        .filter_map(WireRate::into_offer)
        .collect())
}

// =============================================================================
// View
// =============================================================================

/// One quote as rendered on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateView {
    pub id: String,
    pub provider: String,
    pub service_level: String,
    pub amount: String,
}

impl From<&RateOffer> for RateView {
    fn from(offer: &RateOffer) -> Self {
        Self {
            id: offer.id.to_string(),
            provider: offer.provider.clone(),
            service_level: offer.service_level.clone(),
            amount: offer.price().display(),
        }
    }
}

/// Shipment panel state after a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentView {
    pub rates: Vec<RateView>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ShipmentView {
    /// The panel before any lookup has been made.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            rates: Vec::new(),
            loading: false,
            message: None,
        }
    }

    /// Build the panel from a lookup result.
    ///
    /// Errors are logged and shown the same way as an empty result.
    #[must_use]
    pub fn from_result(result: Result<Vec<RateOffer>, ShipmentError>) -> Self {
        let offers = result.unwrap_or_else(|e| {
            warn!(error = %e, "Shipping rate lookup failed");
            Vec::new()
        });

        let message = offers.is_empty().then(|| NO_RATES_MESSAGE.to_owned());
        Self {
            rates: offers.iter().map(RateView::from).collect(),
            loading: false,
            message,
        }
    }
}
