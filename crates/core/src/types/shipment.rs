//! Shipping address and rate offer types.

use serde::{Deserialize, Serialize};

use super::id::RateOfferId;
use super::price::{CurrencyCode, Price};

/// Errors that can occur when validating a [`ShippingAddress`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

fn default_country() -> String {
    "Bangladesh".to_owned()
}

/// Destination address submitted for a shipping quote.
///
/// Serialized in the camelCase shape the rate endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    pub city: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub postal_code: String,
}

impl ShippingAddress {
    /// Check that every required field has a value.
    ///
    /// # Errors
    ///
    /// Returns the first blank required field, in form order.
    pub fn validate(&self) -> Result<(), AddressError> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("street", &self.street),
            ("city", &self.city),
            ("country", &self.country),
            ("postalCode", &self.postal_code),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AddressError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// One shipping-cost quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOffer {
    pub id: RateOfferId,
    /// Carrier name (e.g., "USPS").
    pub provider: String,
    /// Service-level label (e.g., "Priority Mail").
    pub service_level: String,
    /// Amount in minor currency units.
    pub amount_minor: i64,
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl RateOffer {
    /// The quoted amount in standard units.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::from_minor_units(self.amount_minor, self.currency_code)
    }
}
