use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use crate::{errors::ServiceError, AppState};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Connectivity probe: round-trips the database pool.
pub async fn db_test(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    state
        .db
        .ping()
        .await
        .map_err(ServiceError::DatabaseError)?;

    Ok(Json(json!({
        "success": true,
        "time": Utc::now().to_rfc3339(),
    })))
}
