//! Cart store implementation.

use hekto_core::{Cart, CartError, CartLineItem, ProductId};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::storage::Storage;

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// A cart bound to the store it persists to.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
}

impl<S: Storage> CartStore<S> {
    /// Read the persisted cart.
    ///
    /// Never fails: a missing entry, an unreadable store, or a malformed
    /// record all yield an empty cart.
    #[instrument(skip(storage))]
    pub async fn load(storage: S) -> Self {
        let cart = match storage.get(CART_KEY).await {
            Ok(Some(raw)) => decode_cart(&raw),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                Cart::new()
            }
        };

        debug!(lines = cart.len(), "Loaded cart");
        Self { storage, cart }
    }

    /// Add `quantity` units of `item` and persist.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the quantity is rejected. Storage failures
    /// are logged, not returned.
    #[instrument(skip(self, item), fields(id = %item.id))]
    pub async fn add(&mut self, item: CartLineItem, quantity: u32) -> Result<&Cart, CartError> {
        self.cart.add(item, quantity)?;
        self.persist().await;
        Ok(&self.cart)
    }

    /// Increase a line by one and persist. Returns `false` if the id is absent.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn increment(&mut self, id: &ProductId) -> bool {
        let found = self.cart.increment(id);
        if found {
            self.persist().await;
        }
        found
    }

    /// Decrease a line by one, removing it at zero, and persist.
    ///
    /// Returns `false` if the id is absent.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn decrement(&mut self, id: &ProductId) -> bool {
        let found = self.cart.decrement(id);
        if found {
            self.persist().await;
        }
        found
    }

    /// Remove a line and persist. Returns `false` if the id was absent.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn delete(&mut self, id: &ProductId) -> bool {
        let found = self.cart.remove(id);
        if found {
            self.persist().await;
        }
        found
    }

    /// Empty the cart and drop the persisted entry.
    ///
    /// Returns `false` if the persisted entry could not be removed; the
    /// in-memory cart is empty either way.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> bool {
        self.cart.clear();
        match self.storage.remove(CART_KEY).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to clear persisted cart");
                false
            }
        }
    }

    /// Sum of `price * quantity`, unrounded.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    /// Write the whole cart, replacing the stored entry.
    ///
    /// The in-memory cart stays authoritative if the write fails.
    async fn persist(&self) {
        let raw = encode_cart(&self.cart);
        if let Err(e) = self.storage.set(CART_KEY, raw).await {
            error!(error = %e, "Failed to persist cart");
        }
    }
}

/// Decode a persisted cart record.
///
/// Anything that is not a JSON array decodes to an empty cart. Lines that do
/// not parse (missing or empty `_id`, wrong field types) are skipped, and the
/// survivors are normalized so the cart invariants hold.
#[must_use]
pub fn decode_cart(raw: &str) -> Cart {
    let values = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(values)) => values,
        Ok(other) => {
            warn!(kind = json_kind(&other), "Persisted cart is not an array, ignoring");
            return Cart::new();
        }
        Err(e) => {
            warn!(error = %e, "Persisted cart is not valid JSON, ignoring");
            return Cart::new();
        }
    };

    let lines = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<CartLineItem>(value) {
            Ok(line) => Some(line),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed cart line");
                None
            }
        });

    Cart::from_items(lines)
}

/// Serialize a cart to its persisted record.
#[must_use]
pub fn encode_cart(cart: &Cart) -> String {
    // A cart holds only strings, numbers and JSON values, so this cannot fail.
    serde_json::to_string(cart).unwrap_or_else(|e| {
        error!(error = %e, "Failed to serialize cart");
        "[]".to_string()
    })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
