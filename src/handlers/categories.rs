use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{auth::RoleContext, entities::category, errors::ServiceError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub requires_external_id: Option<bool>,
}

#[derive(Serialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub categories: Vec<category::Model>,
}

#[derive(Serialize)]
pub struct GameListResponse {
    pub success: bool,
    pub games: Vec<category::Model>,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub success: bool,
    pub category: category::Model,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub success: bool,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let categories = state.services.catalog.list_categories().await?;
    Ok(Json(CategoryListResponse {
        success: true,
        categories,
    }))
}

/// Storefront alias over the same catalog; the customer UI calls them games.
pub async fn list_games(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let games = state.services.catalog.list_categories().await?;
    Ok(Json(GameListResponse {
        success: true,
        games,
    }))
}

pub async fn create_category(
    State(state): State<AppState>,
    role: RoleContext,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_full_admin()?;

    let name = required_name(&payload)?;
    let category = state
        .services
        .catalog
        .create_category(name, payload.requires_external_id.unwrap_or(false))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            success: true,
            category,
        }),
    ))
}

pub async fn update_category(
    State(state): State<AppState>,
    role: RoleContext,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_full_admin()?;

    let name = required_name(&payload)?;
    let category = state
        .services
        .catalog
        .update_category(id, name, payload.requires_external_id.unwrap_or(false))
        .await?;

    Ok(Json(CategoryResponse {
        success: true,
        category,
    }))
}

pub async fn delete_category(
    State(state): State<AppState>,
    role: RoleContext,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_full_admin()?;

    state.services.catalog.delete_category(id).await?;
    Ok(Json(DeletedResponse { success: true }))
}

fn required_name(payload: &CategoryPayload) -> Result<&str, ServiceError> {
    payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServiceError::ValidationError("name is required".to_string()))
}
