//! Core types for Hekto.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
mod de;
pub mod id;
pub mod price;
pub mod product;
pub mod shipment;

pub use cart::{Cart, CartError, CartLineItem};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::{Product, ProductTag, top_categories};
pub use shipment::{AddressError, RateOffer, ShippingAddress};
