use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::{
    auth::RoleContext,
    errors::ServiceError,
    services::reports::{CategoryProfitRow, DailyProfitRow},
    AppState,
};

#[derive(Serialize)]
pub struct DailyReportResponse {
    pub success: bool,
    pub rows: Vec<DailyProfitRow>,
}

#[derive(Serialize)]
pub struct CategoryReportResponse {
    pub success: bool,
    pub rows: Vec<CategoryProfitRow>,
}

pub async fn daily_report(
    State(state): State<AppState>,
    role: RoleContext,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_full_admin()?;

    let rows = state.services.reports.daily_profit().await?;
    Ok(Json(DailyReportResponse {
        success: true,
        rows,
    }))
}

pub async fn category_report(
    State(state): State<AppState>,
    role: RoleContext,
) -> Result<impl IntoResponse, ServiceError> {
    role.require_full_admin()?;

    let rows = state.services.reports.profit_by_category().await?;
    Ok(Json(CategoryReportResponse {
        success: true,
        rows,
    }))
}
