//! Persisted cart store.
//!
//! [`CartStore`] pairs a [`Cart`](hekto_core::Cart) with the [`Storage`](crate::storage::Storage)
//! it was loaded from. Every view that touches the cart builds one per
//! request ("page mount"): load, mutate, persist. There is no shared
//! in-memory cart, so two visitors (or two tabs racing on one session) see
//! last-write-wins semantics on the stored entry.

mod store;

pub use store::{CART_KEY, CartStore, decode_cart, encode_cart};
