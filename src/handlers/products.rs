use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    auth::RoleContext,
    entities::product,
    errors::ServiceError,
    services::catalog::ProductInput,
    AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontProductsQuery {
    pub game_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub category_id: Option<i32>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub cost_price: Option<Decimal>,
    pub sell_price: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<product::Model>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: product::Model,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub success: bool,
}

/// Storefront listing for one category key (`?gameId=mobile-legends`),
/// cheapest denomination first.
pub async fn list_storefront_products(
    State(state): State<AppState>,
    Query(query): Query<StorefrontProductsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let game_id = query
        .game_id
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            ServiceError::ValidationError("gameId query parameter is required".to_string())
        })?;

    let products = state.services.catalog.storefront_products(game_id).await?;
    Ok(Json(ProductListResponse {
        success: true,
        products,
    }))
}

pub async fn list_products_admin(
    State(state): State<AppState>,
    role: RoleContext,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_full_admin()?;

    let products = state.services.catalog.list_products().await?;
    Ok(Json(ProductListResponse {
        success: true,
        products,
    }))
}

pub async fn create_product(
    State(state): State<AppState>,
    role: RoleContext,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_full_admin()?;

    let input = into_input(payload)?;
    let product = state.services.catalog.create_product(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            product,
        }),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    role: RoleContext,
    Path(id): Path<i32>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_full_admin()?;

    let input = into_input(payload)?;
    let product = state.services.catalog.update_product(id, input).await?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

pub async fn delete_product(
    State(state): State<AppState>,
    role: RoleContext,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_full_admin()?;

    state.services.catalog.delete_product(id).await?;
    Ok(Json(DeletedResponse { success: true }))
}

fn into_input(payload: ProductPayload) -> Result<ProductInput, ServiceError> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let (Some(category_id), Some(name), Some(sell_price)) =
        (payload.category_id, name, payload.sell_price)
    else {
        return Err(ServiceError::ValidationError(
            "categoryId, name, and sellPrice are required".to_string(),
        ));
    };

    Ok(ProductInput {
        category_id,
        name,
        sku: payload.sku,
        cost_price: payload.cost_price.unwrap_or_default(),
        sell_price,
        description: payload.description,
    })
}
