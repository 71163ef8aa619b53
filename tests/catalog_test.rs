//! Catalog surfaces: category and product administration behind the
//! full-admin gate, plus the public storefront listings.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn seeded_categories_are_listed_publicly() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/categories", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let names: Vec<_> = body["categories"]
        .as_array()
        .expect("categories array")
        .iter()
        .map(|c| c["name"].as_str().expect("name").to_string())
        .collect();
    assert_eq!(names, ["Mobile Legends", "Genshin Impact", "Steam Wallet"]);

    // The storefront alias serves the same rows under a different key.
    let response = app.request(Method::GET, "/api/games", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["games"].as_array().expect("games array").len(), 3);
}

#[tokio::test]
async fn category_mutation_requires_full_admin() {
    let app = TestApp::new().await;
    let payload = json!({ "name": "Valorant", "requiresExternalId": true });

    for role in [None, Some("ordersAdmin")] {
        let response = app
            .request(Method::POST, "/api/categories", Some(payload.clone()), role)
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let response = app
        .request(Method::POST, "/api/categories", Some(payload), Some("admin"))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["category"]["name"], json!("Valorant"));
    assert_eq!(body["category"]["requires_external_id"], json!(true));
}

#[tokio::test]
async fn duplicate_category_names_conflict() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/categories",
            Some(json!({ "name": "Mobile Legends" })),
            Some("owner"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn category_update_and_delete() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/categories",
            Some(json!({ "name": "Valorant" })),
            Some("admin"),
        )
        .await;
    let body = response_json(response).await;
    let id = body["category"]["id"].as_i64().expect("category id");

    let response = app
        .request(
            Method::PUT,
            &format!("/api/categories/{id}"),
            Some(json!({ "name": "Valorant Points", "requiresExternalId": true })),
            Some("admin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["category"]["name"], json!("Valorant Points"));

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/categories/{id}"),
            None,
            Some("admin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/categories/{id}"),
            None,
            Some("admin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storefront_products_require_a_game_key_and_sort_by_price() {
    let app = TestApp::new().await;
    app.seed_product("mobile-legends", "172 Diamonds", dec!(48000), dec!(43000))
        .await;
    app.seed_product("mobile-legends", "86 Diamonds", dec!(25000), dec!(21500))
        .await;

    let response = app.request(Method::GET, "/api/products", None, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::GET, "/api/products?gameId=clash-royale", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::GET,
            "/api/products?gameId=mobile-legends",
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let names: Vec<_> = body["products"]
        .as_array()
        .expect("products array")
        .iter()
        .map(|p| p["name"].as_str().expect("name").to_string())
        .collect();
    assert_eq!(names, ["86 Diamonds", "172 Diamonds"]);
}

#[tokio::test]
async fn admin_product_crud_is_gated_and_validates_category() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/admin/products", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let payload = json!({
        "categoryId": 1,
        "name": "86 Diamonds",
        "sku": "ML-86",
        "costPrice": "21500",
        "sellPrice": "25000",
    });
    let response = app
        .request(
            Method::POST,
            "/api/admin/products",
            Some(payload),
            Some("admin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let id = body["product"]["id"].as_i64().expect("product id");

    // Unknown category is rejected before anything is written.
    let response = app
        .request(
            Method::POST,
            "/api/admin/products",
            Some(json!({ "categoryId": 999, "name": "Orphan", "sellPrice": "1" })),
            Some("admin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Missing required fields are a validation failure.
    let response = app
        .request(
            Method::POST,
            "/api/admin/products",
            Some(json!({ "name": "No Price" })),
            Some("admin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/admin/products/{id}"),
            None,
            Some("admin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn payment_methods_are_listed_publicly() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/payment-methods", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let methods = body["methods"].as_array().expect("methods array");
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0]["name"], json!("QRIS"));
}

#[tokio::test]
async fn health_probes_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], json!("ok"));

    let response = app.request(Method::GET, "/api/db-test", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
}
