//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! hekto cart show
//! hekto cart add prod-1 --title "Comfy Chair" --price 49.99
//! hekto cart increment prod-1
//! hekto cart decrement prod-1
//! hekto cart delete prod-1
//! hekto cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `HEKTO_DATA_DIR` - Directory holding `cart.json` (default: `.hekto`)

use std::path::Path;

use hekto_core::{CartError, CartLineItem, ProductId};
use hekto_storefront::cart::CartStore;
use hekto_storefront::routes::cart::CartView;
use hekto_storefront::storage::FileStorage;
use rust_decimal::Decimal;
use thiserror::Error;

use super::print_json;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The cart rejected the change.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The saved cart could not be removed.
    #[error("Failed to clear the saved cart in {0}")]
    NotCleared(String),

    /// Output could not be written.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

pub(crate) async fn mount(data_dir: &Path) -> CartStore<FileStorage> {
    CartStore::load(FileStorage::new(data_dir)).await
}

fn print_cart(store: &CartStore<FileStorage>) -> Result<(), CartCommandError> {
    print_json(&CartView::from(store.cart()))?;
    Ok(())
}

/// Show the cart.
pub async fn show(data_dir: &Path) -> Result<(), CartCommandError> {
    let store = mount(data_dir).await;
    print_cart(&store)
}

/// Add `quantity` units of an explicit line item.
pub async fn add(
    data_dir: &Path,
    id: ProductId,
    title: String,
    price: Decimal,
    quantity: u32,
) -> Result<(), CartCommandError> {
    let mut store = mount(data_dir).await;
    store.add(CartLineItem::new(id, title, price), quantity).await?;
    print_cart(&store)
}

/// Increase a line by one.
pub async fn increment(data_dir: &Path, id: &ProductId) -> Result<(), CartCommandError> {
    let mut store = mount(data_dir).await;
    if !store.increment(id).await {
        tracing::warn!("{id} is not in the cart");
    }
    print_cart(&store)
}

/// Decrease a line by one.
pub async fn decrement(data_dir: &Path, id: &ProductId) -> Result<(), CartCommandError> {
    let mut store = mount(data_dir).await;
    if !store.decrement(id).await {
        tracing::warn!("{id} is not in the cart");
    }
    print_cart(&store)
}

/// Remove a line.
pub async fn delete(data_dir: &Path, id: &ProductId) -> Result<(), CartCommandError> {
    let mut store = mount(data_dir).await;
    if !store.delete(id).await {
        tracing::warn!("{id} is not in the cart");
    }
    print_cart(&store)
}

/// Empty the cart.
pub async fn clear(data_dir: &Path) -> Result<(), CartCommandError> {
    let mut store = mount(data_dir).await;
    if !store.clear().await {
        return Err(CartCommandError::NotCleared(data_dir.display().to_string()));
    }
    print_cart(&store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_invocations_share_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();

        add(dir.path(), id("p1"), "Chair".to_owned(), Decimal::from(10), 2)
            .await
            .unwrap();
        add(dir.path(), id("p2"), "Lamp".to_owned(), Decimal::new(450, 2), 1)
            .await
            .unwrap();
        decrement(dir.path(), &id("p1")).await.unwrap();
        delete(dir.path(), &id("ghost")).await.unwrap();

        let store = mount(dir.path()).await;
        assert_eq!(store.item_count(), 2);
        assert_eq!(store.total(), Decimal::new(1450, 2));
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = add(dir.path(), id("p1"), String::new(), Decimal::ONE, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CartCommandError::Cart(CartError::ZeroQuantity)));
    }

    #[tokio::test]
    async fn test_clear_empties_the_cart() {
        let dir = tempfile::tempdir().unwrap();
        add(dir.path(), id("p1"), String::new(), Decimal::ONE, 1)
            .await
            .unwrap();

        clear(dir.path()).await.unwrap();
        assert!(mount(dir.path()).await.cart().is_empty());
    }

    #[tokio::test]
    async fn test_clear_fails_when_data_dir_is_unusable() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let err = clear(file.path()).await.unwrap_err();
        assert!(matches!(err, CartCommandError::NotCleared(_)));
    }
}
