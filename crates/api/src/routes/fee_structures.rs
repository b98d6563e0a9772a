//! Fee structure management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use validator::Validate;

use bursar_core::catalog::FeeFrequency;
use bursar_db::repositories::{
    CreateFeeStructureInput, FeeStructureFilter, FeeStructureRepository, UpdateFeeStructureInput,
};
use bursar_shared::Money;

use crate::{AppState, error::ApiError, extract::ValidatedJson};

/// Creates the fee structure routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fee-structures", get(list_fee_structures).post(create_fee_structure))
        .route(
            "/fee-structures/{code}",
            get(get_fee_structure)
                .patch(update_fee_structure)
                .delete(delete_fee_structure),
        )
}

/// Query parameters for listing fee structures.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFeeStructuresQuery {
    /// Filter by class.
    pub class_code: Option<String>,
    /// Filter by academic year.
    pub academic_year: Option<String>,
    /// Filter by active flag.
    pub is_active: Option<bool>,
}

/// Request body for creating a fee structure.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeStructureRequest {
    /// Unique code.
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    /// Fee type charged.
    #[validate(length(min = 1, max = 20))]
    pub fee_type_code: String,
    /// Class billed.
    #[validate(length(min = 1, max = 8))]
    pub class_code: String,
    /// Billing frequency.
    pub frequency: FeeFrequency,
    /// Amount billed each time; non-negative, two decimals at most.
    pub amount: Money,
    /// Academic year, e.g. `2024-2025`.
    #[validate(length(min = 1, max = 20))]
    pub academic_year: String,
    /// Whether the structure is billed (default: true).
    pub is_active: Option<bool>,
}

/// Request body for updating a fee structure.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeStructureRequest {
    /// Fee type charged.
    #[validate(length(min = 1, max = 20))]
    pub fee_type_code: Option<String>,
    /// Class billed.
    #[validate(length(min = 1, max = 8))]
    pub class_code: Option<String>,
    /// Billing frequency.
    pub frequency: Option<FeeFrequency>,
    /// Amount billed.
    pub amount: Option<Money>,
    /// Academic year.
    #[validate(length(min = 1, max = 20))]
    pub academic_year: Option<String>,
    /// Whether the structure is billed.
    pub is_active: Option<bool>,
}

/// POST `/fee-structures` - Create a fee structure.
async fn create_fee_structure(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateFeeStructureRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let structure = FeeStructureRepository::new((*state.db).clone())
        .create(CreateFeeStructureInput {
            code: payload.code,
            fee_type_code: payload.fee_type_code,
            class_code: payload.class_code,
            frequency: payload.frequency,
            amount: payload.amount,
            academic_year: payload.academic_year,
            is_active: payload.is_active.unwrap_or(true),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(structure)))
}

/// GET `/fee-structures` - List fee structures ordered by code.
async fn list_fee_structures(
    State(state): State<AppState>,
    Query(query): Query<ListFeeStructuresQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let structures = FeeStructureRepository::new((*state.db).clone())
        .list(FeeStructureFilter {
            class_code: query.class_code,
            academic_year: query.academic_year,
            is_active: query.is_active,
        })
        .await?;
    Ok(Json(structures))
}

/// GET `/fee-structures/{code}` - Get one fee structure.
async fn get_fee_structure(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let structure = FeeStructureRepository::new((*state.db).clone()).get(&code).await?;
    Ok(Json(structure))
}

/// PATCH `/fee-structures/{code}` - Update a fee structure.
async fn update_fee_structure(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateFeeStructureRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let structure = FeeStructureRepository::new((*state.db).clone())
        .update(
            &code,
            UpdateFeeStructureInput {
                fee_type_code: payload.fee_type_code,
                class_code: payload.class_code,
                frequency: payload.frequency,
                amount: payload.amount,
                academic_year: payload.academic_year,
                is_active: payload.is_active,
            },
        )
        .await?;
    Ok(Json(structure))
}

/// DELETE `/fee-structures/{code}` - Soft-delete a fee structure.
async fn delete_fee_structure(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    FeeStructureRepository::new((*state.db).clone()).delete(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
