use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{entities::customer, errors::ServiceError, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct CustomerEnvelope {
    pub success: bool,
    pub customer: CustomerBody,
}

#[derive(Serialize)]
pub struct CustomerBody {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<customer::Model> for CustomerBody {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.display_name,
            phone: model.phone,
            email: model.email,
        }
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let name = payload.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let (Some(name), Some(email)) = (name, email) else {
        return Err(ServiceError::ValidationError(
            "name and email are required".to_string(),
        ));
    };
    payload.validate()?;

    let customer = state
        .services
        .customers
        .create(name, email, payload.phone.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerEnvelope {
            success: true,
            customer: customer.into(),
        }),
    ))
}

pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let Some(email) = email else {
        return Err(ServiceError::ValidationError(
            "email is required".to_string(),
        ));
    };

    match state.services.customers.find_by_email(email).await? {
        Some(customer) => Ok(Json(CustomerEnvelope {
            success: true,
            customer: customer.into(),
        })),
        None => Err(ServiceError::Unauthorized(
            "Invalid credentials".to_string(),
        )),
    }
}
