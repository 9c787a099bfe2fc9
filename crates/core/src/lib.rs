//! Hekto Core - Shared types library.
//!
//! This crate provides the types used across all Hekto components:
//! - `storefront` - Headless storefront service (catalog, cart, shipment quotes)
//! - `cli` - Command-line access to the same cart and catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP clients,
//! no storage. The cart rules live here so every surface shares one
//! implementation; persistence is layered on top by the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, cart state, catalog records, and shipping types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
