use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::{entities::payment_method, errors::ServiceError, AppState};

#[derive(Serialize)]
pub struct PaymentMethodListResponse {
    pub success: bool,
    pub methods: Vec<payment_method::Model>,
}

pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let methods = state.services.catalog.list_payment_methods().await?;
    Ok(Json(PaymentMethodListResponse {
        success: true,
        methods,
    }))
}
