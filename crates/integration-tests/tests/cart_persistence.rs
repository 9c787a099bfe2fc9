//! Cart store over the file backend, as the CLI uses it.

#![allow(clippy::unwrap_used)]

use hekto_core::{CartLineItem, ProductId};
use hekto_storefront::cart::{CART_KEY, CartStore};
use hekto_storefront::storage::{FileStorage, Storage};
use rust_decimal::Decimal;

fn line(id: &str, price: Decimal) -> CartLineItem {
    CartLineItem::new(ProductId::parse(id).unwrap(), format!("Item {id}"), price)
        .with_extra("imageUrl", format!("/img/{id}.png"))
}

#[tokio::test]
async fn test_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = CartStore::load(FileStorage::new(dir.path())).await;
    store.add(line("p1", Decimal::new(1999, 2)), 2).await.unwrap();
    store.add(line("p2", Decimal::new(5, 1)), 1).await.unwrap();
    let expected = store.into_cart();

    let reloaded = CartStore::load(FileStorage::new(dir.path())).await;
    assert_eq!(reloaded.cart(), &expected);
    assert_eq!(reloaded.total(), Decimal::new(4048, 2));
    assert!(dir.path().join("cart.json").exists());
}

#[tokio::test]
async fn test_malformed_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cart.json"), "{\"oops\":").unwrap();

    let store = CartStore::load(FileStorage::new(dir.path())).await;
    assert!(store.cart().is_empty());
}

#[tokio::test]
async fn test_hand_edited_record_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage
        .set(
            CART_KEY,
            r#"[{"_id":"p1","price":2,"quantity":1},{"_id":"p1","price":2},{"_id":"p2","quantity":0}]"#
                .to_string(),
        )
        .await
        .unwrap();

    let store = CartStore::load(storage).await;
    assert_eq!(store.cart().len(), 1);
    assert_eq!(store.item_count(), 2);
    assert_eq!(store.total(), Decimal::from(4));
}

#[tokio::test]
async fn test_clear_removes_file() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = CartStore::load(FileStorage::new(dir.path())).await;
    store.add(line("p1", Decimal::ONE), 1).await.unwrap();
    store.clear().await;

    assert!(!dir.path().join("cart.json").exists());
    assert!(CartStore::load(FileStorage::new(dir.path())).await.cart().is_empty());
}
