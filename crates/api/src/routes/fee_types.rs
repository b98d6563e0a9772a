//! Fee type management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use validator::Validate;

use bursar_core::catalog::FeeApplicability;
use bursar_db::repositories::{CreateFeeTypeInput, FeeTypeRepository, UpdateFeeTypeInput};

use crate::{AppState, error::ApiError, extract::ValidatedJson};

/// Creates the fee type routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fee-types", get(list_fee_types).post(create_fee_type))
        .route(
            "/fee-types/{code}",
            get(get_fee_type).patch(update_fee_type).delete(delete_fee_type),
        )
}

/// Request body for creating a fee type.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeTypeRequest {
    /// Unique code.
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Optional description.
    #[validate(length(max = 255))]
    pub description: Option<String>,
    /// Activity the fee applies to (default: BOTH).
    pub applicable_to: Option<FeeApplicability>,
    /// Whether the type is offered (default: true).
    pub is_active: Option<bool>,
}

/// Request body for updating a fee type.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeTypeRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// Description.
    #[validate(length(max = 255))]
    pub description: Option<String>,
    /// Activity the fee applies to.
    pub applicable_to: Option<FeeApplicability>,
    /// Whether the type is offered.
    pub is_active: Option<bool>,
}

/// POST `/fee-types` - Create a fee type.
async fn create_fee_type(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateFeeTypeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = FeeTypeRepository::new((*state.db).clone());

    let fee_type = repo
        .create(CreateFeeTypeInput {
            code: payload.code,
            name: payload.name,
            description: payload.description,
            applicable_to: payload.applicable_to.unwrap_or(FeeApplicability::Both),
            is_active: payload.is_active.unwrap_or(true),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(fee_type)))
}

/// GET `/fee-types` - List fee types ordered by code.
async fn list_fee_types(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let fee_types = FeeTypeRepository::new((*state.db).clone()).list().await?;
    Ok(Json(fee_types))
}

/// GET `/fee-types/{code}` - Get one fee type.
async fn get_fee_type(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let fee_type = FeeTypeRepository::new((*state.db).clone()).get(&code).await?;
    Ok(Json(fee_type))
}

/// PATCH `/fee-types/{code}` - Update a fee type.
async fn update_fee_type(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateFeeTypeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fee_type = FeeTypeRepository::new((*state.db).clone())
        .update(
            &code,
            UpdateFeeTypeInput {
                name: payload.name,
                description: payload.description.map(Some),
                applicable_to: payload.applicable_to,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(fee_type))
}

/// DELETE `/fee-types/{code}` - Soft-delete a fee type.
async fn delete_fee_type(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    FeeTypeRepository::new((*state.db).clone()).delete(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
