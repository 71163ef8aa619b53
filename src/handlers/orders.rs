use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{
    auth::RoleContext,
    entities::order::PaymentStatus,
    errors::ServiceError,
    services::orders::{CreateOrderRequest, OrderDetailRow},
    AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub invoice_number: String,
    pub order_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub customer_id: Option<i32>,
}

#[derive(Serialize)]
pub struct OrderListResponse {
    pub success: bool,
    pub orders: Vec<OrderDetailRow>,
}

#[derive(Serialize)]
pub struct InvoiceDetailResponse {
    pub success: bool,
    pub rows: Vec<OrderDetailRow>,
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.orders.create_order(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            success: true,
            invoice_number: created.invoice_number,
            order_id: created.order_id,
        }),
    ))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    role: RoleContext,
    Path(id): Path<i32>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_orders_admin()?;

    let status = payload
        .status
        .as_deref()
        .and_then(|raw| PaymentStatus::from_str(raw).ok())
        .ok_or_else(|| {
            ServiceError::ValidationError(
                "Invalid status. Use Pending, Success, or Failed.".to_string(),
            )
        })?;

    state.services.order_status.set_status(id, status).await?;

    Ok(Json(StatusUpdateResponse { success: true }))
}

/// Public listing used by the customer orders page.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let orders = run_listing(&state, query).await?;
    Ok(Json(OrderListResponse {
        success: true,
        orders,
    }))
}

/// Staff view over the same listing, behind the orders-admin gate.
pub async fn list_orders_admin(
    State(state): State<AppState>,
    role: RoleContext,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_orders_admin()?;

    let orders = run_listing(&state, query).await?;
    Ok(Json(OrderListResponse {
        success: true,
        orders,
    }))
}

pub async fn get_order_by_invoice(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state
        .services
        .orders
        .find_by_invoice(&invoice_number)
        .await?;

    Ok(Json(InvoiceDetailResponse {
        success: true,
        rows,
    }))
}

async fn run_listing(
    state: &AppState,
    query: OrderListQuery,
) -> Result<Vec<OrderDetailRow>, ServiceError> {
    let status = query
        .status
        .as_deref()
        .map(|raw| {
            PaymentStatus::from_str(raw).map_err(|_| {
                ServiceError::ValidationError(
                    "Invalid status filter. Use Pending, Success, or Failed.".to_string(),
                )
            })
        })
        .transpose()?;

    state
        .services
        .orders
        .list_orders(status, query.customer_id)
        .await
}
