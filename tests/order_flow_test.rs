//! End-to-end coverage for order capture: atomic creation, guest fallback,
//! game-account reuse, invoice uniqueness, and price snapshots.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use futures::future::join_all;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use serde_json::{json, Value};
use topup_api::entities::{game_account, order, order_line};

fn order_payload(product_id: i32) -> Value {
    json!({
        "categoryKey": "mobile-legends",
        "productId": product_id,
        "paymentMethodId": 1,
        "externalUserId": "12345",
        "server": "2001",
    })
}

async fn count_game_accounts(app: &TestApp) -> usize {
    game_account::Entity::find()
        .all(&*app.state.db)
        .await
        .expect("count game accounts")
        .len()
}

async fn count_orders(app: &TestApp) -> usize {
    order::Entity::find()
        .all(&*app.state.db)
        .await
        .expect("count orders")
        .len()
}

#[tokio::test]
async fn guest_order_creates_game_account_and_pending_order() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("mobile-legends", "86 Diamonds", dec!(25000), dec!(21500))
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(order_payload(product.id)),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    let invoice_number = body["invoiceNumber"].as_str().expect("invoice number");
    assert!(invoice_number.starts_with("ESL-"));
    let order_id = body["orderId"].as_i64().expect("order id") as i32;

    // Exactly one new game account, attributed to the walk-in guest.
    let accounts = game_account::Entity::find()
        .all(&*app.state.db)
        .await
        .expect("game accounts");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].external_user_id, "12345");
    assert_eq!(accounts[0].server.as_deref(), Some("2001"));
    assert_eq!(accounts[0].nickname, None);

    let order = order::Entity::find_by_id(order_id)
        .one(&*app.state.db)
        .await
        .expect("order query")
        .expect("order row");
    assert_eq!(order.status, "Pending");
    assert_eq!(order.invoice_number, invoice_number);
    assert!(order.customer_id.is_some(), "guest fallback should attach");

    let lines = order_line::Entity::find()
        .all(&*app.state.db)
        .await
        .expect("order lines");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].order_id, order_id);
    assert_eq!(lines[0].quantity, 1);
    assert_eq!(lines[0].game_account_id, Some(accounts[0].id));
    assert_eq!(lines[0].unit_price, dec!(25000));
    assert_eq!(lines[0].line_total, dec!(25000));
    assert_eq!(lines[0].margin, dec!(3500));
}

#[tokio::test]
async fn repeat_order_reuses_game_account() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("mobile-legends", "86 Diamonds", dec!(25000), dec!(21500))
        .await;

    let first = app
        .request(
            Method::POST,
            "/api/orders",
            Some(order_payload(product.id)),
            None,
        )
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .request(
            Method::POST,
            "/api/orders",
            Some(order_payload(product.id)),
            None,
        )
        .await;
    assert_eq!(second.status(), StatusCode::CREATED);

    assert_eq!(count_orders(&app).await, 2);
    assert_eq!(count_game_accounts(&app).await, 1, "account must be reused");
}

#[tokio::test]
async fn missing_required_fields_fail_validation() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({ "categoryKey": "mobile-legends" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("validation_error"));
}

#[tokio::test]
async fn unknown_category_and_mismatched_product_are_rejected() {
    let app = TestApp::new().await;
    let steam_product = app
        .seed_product("steam-wallet", "IDR 60k Wallet", dec!(60000), dec!(58000))
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "categoryKey": "clash-royale",
                "productId": steam_product.id,
                "paymentMethodId": 1,
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Existing product, but not in the addressed category.
    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(order_payload(steam_product.id)),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(count_orders(&app).await, 0);
}

#[tokio::test]
async fn failed_creation_leaves_no_partial_rows() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("mobile-legends", "86 Diamonds", dec!(25000), dec!(21500))
        .await;

    // A nonexistent explicit customer makes the game-account insert violate
    // its foreign key after validation has already passed.
    let mut payload = order_payload(product.id);
    payload["customerId"] = json!(9999);

    let response = app
        .request(Method::POST, "/api/orders", Some(payload), None)
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(count_orders(&app).await, 0);
    assert_eq!(count_game_accounts(&app).await, 0);
    let lines = order_line::Entity::find()
        .all(&*app.state.db)
        .await
        .expect("order lines");
    assert!(lines.is_empty());
}

#[tokio::test]
async fn invoice_numbers_are_pairwise_distinct() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("mobile-legends", "86 Diamonds", dec!(25000), dec!(21500))
        .await;

    for _ in 0..5 {
        let response = app
            .request(
                Method::POST,
                "/api/orders",
                Some(order_payload(product.id)),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let orders = order::Entity::find()
        .all(&*app.state.db)
        .await
        .expect("orders");
    assert_eq!(orders.len(), 5);

    let mut invoices: Vec<_> = orders.iter().map(|o| o.invoice_number.clone()).collect();
    invoices.sort();
    invoices.dedup();
    assert_eq!(invoices.len(), 5, "invoice numbers must be distinct");
}

#[tokio::test]
async fn concurrent_identical_orders_create_one_game_account() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("mobile-legends", "86 Diamonds", dec!(25000), dec!(21500))
        .await;

    let requests = (0..5).map(|_| {
        app.request(
            Method::POST,
            "/api/orders",
            Some(order_payload(product.id)),
            None,
        )
    });

    for response in join_all(requests).await {
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    assert_eq!(count_orders(&app).await, 5);
    assert_eq!(count_game_accounts(&app).await, 1);
}

#[tokio::test]
async fn later_price_changes_do_not_rewrite_order_lines() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("mobile-legends", "86 Diamonds", dec!(25000), dec!(21500))
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(order_payload(product.id)),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Reprice the product through the admin surface.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/admin/products/{}", product.id),
            Some(json!({
                "categoryId": product.category_id,
                "name": "86 Diamonds",
                "sellPrice": "31000",
                "costPrice": "27000",
            })),
            Some("admin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let lines = order_line::Entity::find()
        .all(&*app.state.db)
        .await
        .expect("order lines");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].unit_price, dec!(25000), "snapshot must not move");
    assert_eq!(lines[0].line_total, dec!(25000));
    assert_eq!(lines[0].margin, dec!(3500));
}

#[tokio::test]
async fn categories_without_external_id_skip_game_accounts() {
    let app = TestApp::new().await;
    let product = app
        .seed_product("steam-wallet", "IDR 60k Wallet", dec!(60000), dec!(58000))
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "categoryKey": "steam-wallet",
                "productId": product.id,
                "paymentMethodId": 2,
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(count_game_accounts(&app).await, 0);

    let lines = order_line::Entity::find()
        .all(&*app.state.db)
        .await
        .expect("order lines");
    assert_eq!(lines[0].game_account_id, None);
}
