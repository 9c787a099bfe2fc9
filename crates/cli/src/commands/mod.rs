//! Command implementations.
//!
//! Each command that touches the cart is one page mount against a
//! [`FileStorage`](hekto_storefront::storage::FileStorage): load, mutate,
//! persist, print.

pub mod cart;
pub mod products;
pub mod shipment;

use serde::Serialize;

/// Write a value to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
