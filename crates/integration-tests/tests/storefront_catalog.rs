//! Product routes against the stub catalog.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use hekto_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};

fn ids(products: &Value) -> Vec<&str> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["_id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_product_listing() {
    let ctx = TestContext::new().await;

    let (status, products) = ctx.get_json("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&products), ["chair-1", "lamp-1", "sofa-1"]);
    assert_eq!(products[1]["price"], 4.5);
}

#[tokio::test]
async fn test_product_detail_and_not_found() {
    let ctx = TestContext::new().await;

    let (status, product) = ctx.get_json("/products/chair-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["title"], "Comfy Chair");
    assert_eq!(product["imageUrl"], "https://cdn.test/chair.png");

    let (status, body) = ctx.get_json("/products/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found: ghost");
}

#[tokio::test]
async fn test_product_detail_is_cached() {
    let ctx = TestContext::new().await;

    ctx.get_json("/products/lamp-1").await;
    let after_first = ctx.catalog_hits();
    ctx.get_json("/products/lamp-1").await;

    assert_eq!(ctx.catalog_hits(), after_first);
}

#[tokio::test]
async fn test_add_product_snapshot_to_cart() {
    let ctx = TestContext::new().await;

    let (status, cart) = ctx.post_json("/products/chair-1/cart", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["id"], "chair-1");
    assert_eq!(cart["items"][0]["title"], "Comfy Chair");
    assert_eq!(cart["items"][0]["image_url"], "https://cdn.test/chair.png");
    assert_eq!(cart["items"][0]["extra"]["material"], "Oak");
    assert_eq!(cart["items"][0]["extra"]["categories"], json!(["chairs"]));

    let (_, cart) = ctx
        .post_json("/products/chair-1/cart", &json!({ "quantity": 3 }))
        .await;
    assert_eq!(cart["items"][0]["quantity"], 4);
    assert_eq!(cart["subtotal"], "$40.00");
}

#[tokio::test]
async fn test_add_missing_product_leaves_cart_alone() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.post_json("/products/ghost/cart", &json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, count) = ctx.get_json("/cart/count").await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_catalog_failure_shows_not_found() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get_json("/products/broken-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found: broken-1");

    let (status, _) = ctx.post_json("/products/broken-1/cart", &json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, count) = ctx.get_json("/cart/count").await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_latest_tabs_degrade_independently() {
    let ctx = TestContext::new().await;

    let (status, latest) = ctx.get_json("/products/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&latest["newArrival"]), ["chair-1"]);
    assert_eq!(ids(&latest["trending"]), ["chair-1"]);
    assert_eq!(ids(&latest["featured"]), ["lamp-1"]);
    // The stub rejects the best-seller ordering.
    assert!(ids(&latest["bestSeller"]).is_empty());
}

#[tokio::test]
async fn test_top_categories() {
    let ctx = TestContext::new().await;

    let (status, picked) = ctx.get_json("/products/categories").await;
    assert_eq!(status, StatusCode::OK);

    let pairs: Vec<(&str, &str)> = picked
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["category"].as_str().unwrap(),
                c["product"]["_id"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        [
            ("chairs", "chair-1"),
            ("lighting", "lamp-1"),
            ("desks", "lamp-1"),
            ("sofas", "sofa-1"),
        ]
    );
}
