//! Integration tests for the session cart.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use elegance_integration_tests::{TestClient, TestResponse};

fn trigger(res: &TestResponse) -> serde_json::Value {
    serde_json::from_str(res.header("hx-trigger").unwrap()).unwrap()
}

#[tokio::test]
async fn test_new_session_has_empty_cart() {
    let mut client = TestClient::new();
    let res = client.get("/api/cart").await;

    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["items"].as_array().unwrap().len(), 0);
    assert_eq!(json["count"], 0);
    assert_eq!(json["total"], "0");
}

#[tokio::test]
async fn test_add_merges_quantities() {
    let mut client = TestClient::new();

    let res = client.post_form("/cart/add", "product_id=2&quantity=2").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains('2'));
    assert_eq!(trigger(&res)["cart-notice"], "Added Minimalist Desk Lamp to cart");

    let res = client.post_form("/cart/add", "product_id=2").await;
    assert_eq!(
        trigger(&res)["cart-notice"],
        "Updated quantity for Minimalist Desk Lamp"
    );

    let json = client.get("/api/cart").await.json();
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["quantity"], 3);
    assert_eq!(json["count"], 3);
    assert_eq!(json["total"], "269.97");
}

#[tokio::test]
async fn test_update_remove_and_clear() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", "product_id=2&quantity=2").await;
    client.post_form("/cart/add", "product_id=5").await;

    let res = client.post_form("/cart/update", "product_id=5&quantity=4").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(trigger(&res)["cart-notice"].is_null());
    assert_eq!(client.get("/api/cart").await.json()["count"], 6);

    let res = client.post_form("/cart/update", "product_id=5&quantity=0").await;
    assert_eq!(
        trigger(&res)["cart-notice"],
        "Removed Ceramic Pour-Over Coffee Set from cart"
    );

    let res = client.post_form("/cart/remove", "product_id=2").await;
    assert_eq!(
        trigger(&res)["cart-notice"],
        "Removed Minimalist Desk Lamp from cart"
    );
    assert!(res.body.contains("Your cart is empty"));

    client.post_form("/cart/add", "product_id=8").await;
    let res = client.post_form("/cart/clear", "").await;
    assert_eq!(trigger(&res)["cart-notice"], "Cart cleared");
    assert_eq!(client.get("/api/cart").await.json()["count"], 0);
}

#[tokio::test]
async fn test_remove_absent_item_is_noop() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", "product_id=1").await;

    let res = client.post_form("/cart/remove", "product_id=7").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(trigger(&res).get("cart-notice").is_none());
    assert_eq!(client.get("/api/cart").await.json()["count"], 1);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let mut client = TestClient::new();
    let res = client.post_form("/cart/add", "product_id=999").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(client.get("/api/cart").await.json()["count"], 0);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let mut alice = TestClient::new();
    alice.post_form("/cart/add", "product_id=3").await;

    let mut bob = TestClient::new();
    assert_eq!(bob.get("/api/cart").await.json()["count"], 0);
    assert_eq!(alice.get("/api/cart").await.json()["count"], 1);
}

#[tokio::test]
async fn test_cart_page_and_count_badge() {
    let mut client = TestClient::new();
    client.post_form("/cart/add", "product_id=4&quantity=3").await;

    let res = client.get("/cart/count").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains('3'));

    let res = client.get("/cart").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Italian Leather Wallet"));
    assert!(res.body.contains("$239.97"));
}
