//! Shopping cart state.
//!
//! A [`Cart`] is an ordered list of [`CartLineItem`]s with two invariants:
//!
//! - ids are unique; adding an id that is already present grows its quantity
//! - every line has `quantity >= 1`; a line that would reach zero is removed
//!
//! All operations here are pure. Loading and persisting a cart is the job of
//! the storefront's cart store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;
use super::id::ProductId;

/// Errors returned by cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// An add was requested with a quantity of zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// The line's quantity would exceed `u32::MAX`.
    #[error("quantity overflow for item {0}")]
    QuantityOverflow(ProductId),
    /// The cart total would no longer fit in a `Decimal`.
    #[error("cart total overflow adding item {0}")]
    TotalOverflow(ProductId),
}

const fn default_quantity() -> u32 {
    1
}

/// One product entry in the cart.
///
/// `title` and `price` are snapshotted when the item is added and are never
/// refreshed from the catalog. Any other display fields (image, badge, ...)
/// ride along verbatim in `extra`.
///
/// The serialized shape matches the persisted cart record:
///
/// ```
/// use hekto_core::CartLineItem;
///
/// let json = r#"{"_id":"p1","title":"Chair","price":42.5,"quantity":2,"imageUrl":"/chair.png"}"#;
/// let line: CartLineItem = serde_json::from_str(json).unwrap();
/// assert_eq!(line.id.as_str(), "p1");
/// assert_eq!(line.quantity, 2);
/// assert_eq!(line.extra["imageUrl"], "/chair.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Catalog identifier (not validated against the catalog).
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name at add-time.
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub title: String,
    /// Unit price at add-time.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "de::price_or_zero"
    )]
    pub price: Decimal,
    /// Number of units, always at least 1 inside a [`Cart`].
    #[serde(default = "default_quantity", deserialize_with = "de::quantity_or_one")]
    pub quantity: u32,
    /// Additional snapshotted display fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CartLineItem {
    /// Create a line with quantity 1 and no extra fields.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            quantity: 1,
            extra: Map::new(),
        }
    }

    /// Attach an extra snapshotted field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// `price * quantity` at full precision.
    ///
    /// Saturates at the `Decimal` bounds; a line inside a [`Cart`] never does.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Cost of `units` more of this line, or `None` on overflow.
    fn cost_of(&self, units: u32) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(units))
    }
}

/// The ordered, id-unique list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from untrusted lines, restoring the invariants.
    ///
    /// Lines with zero quantity are dropped. Repeated ids are merged into the
    /// first occurrence, which keeps its position and snapshot. A line that
    /// would push the total past the `Decimal` range is dropped.
    #[must_use]
    pub fn from_items(lines: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            let quantity = line.quantity;
            // A rejected line is dropped.
            let _ = cart.add(line, quantity);
        }
        cart
    }

    /// Add `quantity_delta` units of `item`.
    ///
    /// If the id is already in the cart its quantity grows and the existing
    /// snapshot is kept. Otherwise the item is appended with
    /// `quantity = quantity_delta`; the quantity carried by `item` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a zero delta,
    /// [`CartError::QuantityOverflow`] if the quantity would exceed `u32::MAX`
    /// and [`CartError::TotalOverflow`] if the cart total would no longer be
    /// representable. The cart is unchanged on error.
    pub fn add(&mut self, item: CartLineItem, quantity_delta: u32) -> Result<(), CartError> {
        if quantity_delta == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let total = self.checked_total();
        if let Some(existing) = self.items.iter_mut().find(|l| l.id == item.id) {
            let quantity = existing
                .quantity
                .checked_add(quantity_delta)
                .ok_or_else(|| CartError::QuantityOverflow(item.id.clone()))?;
            existing
                .cost_of(quantity_delta)
                .zip(total)
                .and_then(|(cost, total)| total.checked_add(cost))
                .ok_or_else(|| CartError::TotalOverflow(item.id.clone()))?;
            existing.quantity = quantity;
            return Ok(());
        }

        item.cost_of(quantity_delta)
            .zip(total)
            .and_then(|(cost, total)| total.checked_add(cost))
            .ok_or_else(|| CartError::TotalOverflow(item.id.clone()))?;

        self.items.push(CartLineItem {
            quantity: quantity_delta,
            ..item
        });
        Ok(())
    }

    /// Increase a line's quantity by one. Returns `false` if the id is absent.
    ///
    /// The quantity stays put when it, or the cart total, is already at its
    /// limit.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        let total = self.checked_total();
        let Some(line) = self.items.iter_mut().find(|l| &l.id == id) else {
            return false;
        };

        let fits = line
            .cost_of(1)
            .zip(total)
            .and_then(|(cost, total)| total.checked_add(cost))
            .is_some();
        if fits {
            line.quantity = line.quantity.saturating_add(1);
        }
        true
    }

    /// Decrease a line's quantity by one, removing it when it reaches zero.
    ///
    /// Returns `false` if the id is absent.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let Some(line) = self.items.get_mut(index) else {
            return false;
        };

        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            self.items.remove(index);
        }
        true
    }

    /// Remove a line regardless of quantity. Returns `false` if the id is absent.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|l| &l.id != id);
        self.items.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all lines, unrounded.
    ///
    /// Mutations keep this sum representable, so it never saturates.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    fn checked_total(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line.cost_of(line.quantity)?)
        })
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .map(|l| l.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|l| &l.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|l| &l.id == id)
    }
}

impl From<Vec<CartLineItem>> for Cart {
    fn from(lines: Vec<CartLineItem>) -> Self {
        Self::from_items(lines)
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    fn line(s: &str, price: i64) -> CartLineItem {
        CartLineItem::new(id(s), format!("Product {s}"), Decimal::from(price))
    }

    #[test]
    fn test_add_same_id_twice_merges() {
        let mut cart = Cart::new();
        cart.add(line("p1", 10), 1).unwrap();
        cart.add(line("p1", 10), 1).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&id("p1")).unwrap().quantity, 2);
        assert_eq!(cart.total(), Decimal::from(20));
    }

    #[test]
    fn test_add_appends_new_ids_in_order() {
        let mut cart = Cart::new();
        cart.add(line("p1", 1), 1).unwrap();
        cart.add(line("p2", 1), 3).unwrap();
        cart.add(line("p1", 1), 1).unwrap();

        let ids: Vec<_> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2"]);
        assert_eq!(cart.get(&id("p2")).unwrap().quantity, 3);
    }

    #[test]
    fn test_add_keeps_existing_snapshot() {
        let mut cart = Cart::new();
        cart.add(line("p1", 10), 1).unwrap();
        cart.add(line("p1", 99), 1).unwrap();

        assert_eq!(cart.get(&id("p1")).unwrap().price, Decimal::from(10));
    }

    #[test]
    fn test_add_ignores_quantity_on_item() {
        let mut cart = Cart::new();
        let mut item = line("p1", 5);
        item.quantity = 7;
        cart.add(item, 2).unwrap();

        assert_eq!(cart.get(&id("p1")).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_zero_quantity_rejected() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(line("p1", 1), 0), Err(CartError::ZeroQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_overflow_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add(line("p1", 1), u32::MAX).unwrap();

        let result = cart.add(line("p1", 1), 1);
        assert!(matches!(result, Err(CartError::QuantityOverflow(_))));
        assert_eq!(cart.get(&id("p1")).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_add_rejects_line_total_overflow() {
        let mut cart = Cart::new();
        let price = Decimal::from_i128_with_scale(10_i128.pow(20), 0);
        let huge = CartLineItem::new(id("p1"), "Yacht", price);

        assert_eq!(
            cart.add(huge, u32::MAX),
            Err(CartError::TotalOverflow(id("p1")))
        );
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_add_rejects_cart_total_overflow() {
        let big = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let mut cart = Cart::new();
        cart.add(CartLineItem::new(id("a"), "A", big), 1).unwrap();

        let result = cart.add(CartLineItem::new(id("b"), "B", big), 1);
        assert_eq!(result, Err(CartError::TotalOverflow(id("b"))));
        assert!(cart.get(&id("b")).is_none());

        assert!(cart.increment(&id("a")));
        assert_eq!(cart.get(&id("a")).unwrap().quantity, 1);
        assert_eq!(cart.total(), big);
    }

    #[test]
    fn test_from_items_drops_lines_that_overflow_total() {
        let big = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let cart = Cart::from_items([
            CartLineItem::new(id("a"), "A", big),
            CartLineItem::new(id("b"), "B", big),
            line("c", 3),
        ]);

        let ids: Vec<_> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(cart.total(), big + Decimal::from(3));
    }

    #[test]
    fn test_deserialize_null_fields_default() {
        let json = r#"[{"_id":"p1","title":null,"price":null,"quantity":null}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        let p1 = cart.get(&id("p1")).unwrap();
        assert_eq!(p1.title, "");
        assert_eq!(p1.price, Decimal::ZERO);
        assert_eq!(p1.quantity, 1);
    }

    #[test]
    fn test_increment_and_missing_id() {
        let mut cart = Cart::new();
        cart.add(line("p1", 3), 1).unwrap();

        assert!(cart.increment(&id("p1")));
        assert_eq!(cart.get(&id("p1")).unwrap().quantity, 2);

        let before = cart.clone();
        assert!(!cart.increment(&id("nope")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add(line("p1", 10), 2).unwrap();
        cart.add(line("p2", 5), 1).unwrap();

        assert!(cart.decrement(&id("p1")));
        assert_eq!(cart.get(&id("p1")).unwrap().quantity, 1);

        assert!(cart.decrement(&id("p1")));
        assert!(cart.get(&id("p1")).is_none());
        assert_eq!(cart.total(), Decimal::from(5));
    }

    #[test]
    fn test_decrement_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(line("p1", 1), 1).unwrap();
        assert!(!cart.decrement(&id("p2")));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_only_target() {
        let mut cart = Cart::new();
        cart.add(line("p1", 1), 1).unwrap();
        cart.add(line("p2", 1), 1).unwrap();

        assert!(cart.remove(&id("p1")));
        assert!(!cart.remove(&id("p1")));

        let ids: Vec<_> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["p2"]);
    }

    #[test]
    fn test_total_uses_full_precision() {
        let mut cart = Cart::new();
        let item = CartLineItem::new(id("p1"), "Pen", Decimal::new(3333, 3));
        cart.add(item, 3).unwrap();

        assert_eq!(cart.total(), Decimal::new(9999, 3));
    }

    #[test]
    fn test_item_count() {
        let mut cart = Cart::new();
        cart.add(line("p1", 1), 2).unwrap();
        cart.add(line("p2", 1), 3).unwrap();
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_from_items_normalizes() {
        let mut zero = line("p3", 1);
        zero.quantity = 0;
        let cart = Cart::from_items([line("p1", 1), line("p2", 1), line("p1", 1), zero]);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(&id("p1")).unwrap().quantity, 2);
        assert!(cart.get(&id("p3")).is_none());
    }

    #[test]
    fn test_deserialize_defaults_and_extra_fields() {
        let json = r#"[{"_id":"p1","price":10},{"_id":"p2","title":"Sofa","price":12.5,"quantity":3,"badge":"New"}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        let p1 = cart.get(&id("p1")).unwrap();
        assert_eq!(p1.title, "");
        assert_eq!(p1.quantity, 1);

        let p2 = cart.get(&id("p2")).unwrap();
        assert_eq!(p2.price, Decimal::new(125, 1));
        assert_eq!(p2.extra.get("badge"), Some(&Value::from("New")));
    }

    #[test]
    fn test_serialize_matches_record_shape() {
        let mut cart = Cart::new();
        cart.add(line("p1", 10).with_extra("imageUrl", "/a.png"), 2)
            .unwrap();

        let value = serde_json::to_value(&cart).unwrap();
        let first = &value[0];
        assert_eq!(first["_id"], "p1");
        assert_eq!(first["quantity"], 2);
        assert_eq!(first["price"], 10.0);
        assert_eq!(first["imageUrl"], "/a.png");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod proptests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    fn item(index: u8, price_cents: u32) -> CartLineItem {
        CartLineItem::new(
            ProductId::parse(&format!("p{index}")).unwrap(),
            "item",
            Decimal::new(i64::from(price_cents), 2),
        )
    }

    proptest! {
        #[test]
        fn adds_yield_one_line_per_id_with_summed_quantity(
            ops in prop::collection::vec((0u8..6, 1u32..20), 0..40)
        ) {
            let mut cart = Cart::new();
            let mut expected: HashMap<String, u32> = HashMap::new();
            for (index, delta) in &ops {
                cart.add(item(*index, 100), *delta).unwrap();
                *expected.entry(format!("p{index}")).or_default() += delta;
            }

            prop_assert_eq!(cart.len(), expected.len());
            for line in cart.items() {
                prop_assert_eq!(Some(&line.quantity), expected.get(line.id.as_str()));
            }
        }

        #[test]
        fn total_is_independent_of_insertion_order(
            lines in prop::collection::vec((0u8..10, 0u32..100_000, 1u32..10), 0..20)
        ) {
            let mut forward = Cart::new();
            let mut backward = Cart::new();
            // Distinct ids only, so both carts hold the same snapshots.
            let mut seen = std::collections::HashSet::new();
            let unique: Vec<_> = lines.into_iter().filter(|(i, _, _)| seen.insert(*i)).collect();

            for (index, cents, qty) in &unique {
                forward.add(item(*index, *cents), *qty).unwrap();
            }
            for (index, cents, qty) in unique.iter().rev() {
                backward.add(item(*index, *cents), *qty).unwrap();
            }

            let expected: Decimal = unique
                .iter()
                .map(|(_, cents, qty)| Decimal::new(i64::from(*cents), 2) * Decimal::from(*qty))
                .sum();
            prop_assert_eq!(forward.total(), expected);
            prop_assert_eq!(backward.total(), expected);
        }

        #[test]
        fn remove_is_idempotent(
            ids in prop::collection::vec(0u8..5, 1..10),
            target in 0u8..5
        ) {
            let mut cart = Cart::new();
            for index in ids {
                cart.add(item(index, 100), 1).unwrap();
            }
            let target = ProductId::parse(&format!("p{target}")).unwrap();

            let mut once = cart.clone();
            once.remove(&target);
            let mut twice = once.clone();
            twice.remove(&target);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn quantities_never_reach_zero(
            ops in prop::collection::vec((0u8..3, 0u8..3), 0..60)
        ) {
            let mut cart = Cart::new();
            for (index, op) in ops {
                let id = ProductId::parse(&format!("p{index}")).unwrap();
                match op {
                    0 => { cart.add(item(index, 100), 1).unwrap(); }
                    1 => { cart.decrement(&id); }
                    _ => { cart.increment(&id); }
                }
                prop_assert!(cart.items().iter().all(|l| l.quantity >= 1));
            }
        }
    }
}
