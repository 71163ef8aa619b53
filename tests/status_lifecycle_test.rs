//! Status lifecycle and role gating: settlements are orders-admin-gated,
//! fail closed, and never leak whether the order exists to unprivileged
//! callers.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use serde_json::json;
use topup_api::entities::order;

async fn create_pending_order(app: &TestApp) -> i32 {
    let product = app
        .seed_product("mobile-legends", "86 Diamonds", dec!(25000), dec!(21500))
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/orders",
            Some(json!({
                "categoryKey": "mobile-legends",
                "productId": product.id,
                "paymentMethodId": 1,
                "externalUserId": "12345",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    body["orderId"].as_i64().expect("order id") as i32
}

async fn order_status(app: &TestApp, order_id: i32) -> String {
    order::Entity::find_by_id(order_id)
        .one(&*app.state.db)
        .await
        .expect("order query")
        .expect("order row")
        .status
}

#[tokio::test]
async fn orders_admin_settles_a_pending_order() {
    let app = TestApp::new().await;
    let order_id = create_pending_order(&app).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Success" })),
            Some("ordersAdmin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(order_status(&app, order_id).await, "Success");
}

#[tokio::test]
async fn absent_role_is_rejected_and_status_unchanged() {
    let app = TestApp::new().await;
    let order_id = create_pending_order(&app).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Success" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("authorization_error"));
    assert_eq!(order_status(&app, order_id).await, "Pending");
}

#[tokio::test]
async fn unrecognized_role_marker_is_rejected() {
    let app = TestApp::new().await;
    let order_id = create_pending_order(&app).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Failed" })),
            Some("superuser"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(order_status(&app, order_id).await, "Pending");
}

#[tokio::test]
async fn role_markers_are_case_insensitive_and_admin_tiers_qualify() {
    let app = TestApp::new().await;
    let order_id = create_pending_order(&app).await;

    for role in ["OrdersAdmin", "ADMIN", "owner"] {
        let response = app
            .request(
                Method::POST,
                &format!("/api/orders/{order_id}/status"),
                Some(json!({ "status": "Success" })),
                Some(role),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "role {role} must pass");
    }
}

#[tokio::test]
async fn settled_orders_can_be_resettled() {
    let app = TestApp::new().await;
    let order_id = create_pending_order(&app).await;

    for status in ["Success", "Failed", "Success"] {
        let response = app
            .request(
                Method::POST,
                &format!("/api/orders/{order_id}/status"),
                Some(json!({ "status": status })),
                Some("ordersAdmin"),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(order_status(&app, order_id).await, status);
    }
}

#[tokio::test]
async fn invalid_status_values_fail_validation() {
    let app = TestApp::new().await;
    let order_id = create_pending_order(&app).await;

    for payload in [json!({ "status": "Shipped" }), json!({})] {
        let response = app
            .request(
                Method::POST,
                &format!("/api/orders/{order_id}/status"),
                Some(payload),
                Some("ordersAdmin"),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(order_status(&app, order_id).await, "Pending");
}

#[tokio::test]
async fn missing_order_is_distinguished_only_for_authorized_callers() {
    let app = TestApp::new().await;

    // Authorized caller learns the order does not exist.
    let response = app
        .request(
            Method::POST,
            "/api/orders/4242/status",
            Some(json!({ "status": "Success" })),
            Some("ordersAdmin"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Unauthorized caller gets the same rejection whether or not it exists.
    let response = app
        .request(
            Method::POST,
            "/api/orders/4242/status",
            Some(json!({ "status": "Success" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
