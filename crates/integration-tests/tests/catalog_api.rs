//! Integration tests for the JSON catalog API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use elegance_integration_tests::TestClient;

fn ids(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_all_products() {
    let mut client = TestClient::new();
    let res = client.get("/api/products").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.json()).len(), 8);
}

#[tokio::test]
async fn test_list_by_category_and_price() {
    let mut client = TestClient::new();

    let res = client.get("/api/products?category=electronics").await;
    assert_eq!(res.status, StatusCode::OK);
    let mut electronics = ids(&res.json());
    electronics.sort();
    assert_eq!(electronics, vec!["1", "3", "7"]);

    let res = client
        .get("/api/products?sort=price_low&maxPrice=100")
        .await;
    assert_eq!(ids(&res.json()), vec!["8", "5", "4", "2"]);
}

#[tokio::test]
async fn test_unknown_category_is_bad_request() {
    let mut client = TestClient::new();
    let res = client.get("/api/products?category=toys").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["message"].is_string());
}

#[tokio::test]
async fn test_featured_products() {
    let mut client = TestClient::new();
    let res = client.get("/api/products/featured").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.json()), vec!["5", "3", "2", "1"]);
}

#[tokio::test]
async fn test_similar_products_exclude_current() {
    let mut client = TestClient::new();
    let res = client
        .get("/api/products/similar?category=electronics&productId=1")
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.json()), vec!["3", "7"]);
}

#[tokio::test]
async fn test_category_counts() {
    let mut client = TestClient::new();
    let res = client.get("/api/products/categories").await;

    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    let counts: Vec<(&str, u64)> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["category"].as_str().unwrap(), c["count"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        counts,
        vec![("electronics", 3), ("fashion", 2), ("home", 3)]
    );
}

#[tokio::test]
async fn test_get_product_by_id() {
    let mut client = TestClient::new();
    let res = client.get("/api/products/2").await;

    assert_eq!(res.status, StatusCode::OK);
    let json = res.json();
    assert_eq!(json["name"], "Minimalist Desk Lamp");
    assert_eq!(json["category"], "home");
    assert_eq!(json["countInStock"], 25);
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let mut client = TestClient::new();
    let res = client.get("/api/products/999").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["message"], "Product not found");
}
