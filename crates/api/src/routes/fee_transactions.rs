//! Fee transaction routes: generation, reads, custom amounts, cancellation.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use bursar_core::billing::{BillingMonth, GenerateRequest, TransactionGenerator};
use bursar_core::ledger::{LedgerService, TransactionStatus};
use bursar_db::repositories::{FeeTransactionFilter, FeeTransactionRepository};
use bursar_shared::{Money, StudentId};

use crate::{AppState, error::ApiError, extract::ValidatedJson};

/// Creates the fee transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fee-transactions", get(list_transactions))
        .route("/fee-transactions/generate", post(generate_transactions))
        .route(
            "/fee-transactions/student/{student_id}/outstanding",
            get(student_outstanding),
        )
        .route("/fee-transactions/{code}", get(get_transaction))
        .route("/fee-transactions/{code}/custom-amount", patch(update_custom_amount))
        .route("/fee-transactions/{code}/cancel", post(cancel_transaction))
}

/// Request body for generating a month's obligations.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTransactionsRequest {
    /// Student to bill.
    pub student_id: StudentId,
    /// Billing month, `YYYY-MM`.
    #[validate(length(equal = 7))]
    pub month: String,
    /// Academic year whose structures apply.
    #[validate(length(min = 1, max = 20))]
    pub academic_year: String,
}

/// Request body for overriding the amount owed.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomAmountRequest {
    /// New amount owed; non-negative, two decimals at most.
    pub custom_amount: Money,
    /// Reason for the override.
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

/// Request body for cancelling a transaction.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelTransactionRequest {
    /// Reason for the cancellation.
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// Filter by student.
    pub student_id: Option<StudentId>,
    /// Filter by status.
    pub status: Option<TransactionStatus>,
    /// Due on or after (YYYY-MM-DD).
    pub from_date: Option<NaiveDate>,
    /// Due on or before (YYYY-MM-DD).
    pub to_date: Option<NaiveDate>,
}

/// POST `/fee-transactions/generate` - Bill a student for one month.
async fn generate_transactions(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<GenerateTransactionsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let month: BillingMonth = payload.month.parse()?;
    let request = GenerateRequest {
        student_id: payload.student_id,
        month,
        academic_year: payload.academic_year,
    };

    let created = TransactionGenerator::new(state.unit_of_work())
        .generate(&request)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET `/fee-transactions` - List transactions, oldest due date first.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = FeeTransactionRepository::new((*state.db).clone())
        .list(FeeTransactionFilter {
            student_id: query.student_id,
            status: query.status,
            from_date: query.from_date,
            to_date: query.to_date,
        })
        .await?;
    Ok(Json(transactions))
}

/// GET `/fee-transactions/student/{student_id}/outstanding` - Outstanding totals.
async fn student_outstanding(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let student_id = parse_student_id(&student_id)?;
    let summary = FeeTransactionRepository::new((*state.db).clone())
        .outstanding(student_id)
        .await?;
    Ok(Json(summary))
}

/// GET `/fee-transactions/{code}` - Get one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = FeeTransactionRepository::new((*state.db).clone())
        .get(&code)
        .await?;
    Ok(Json(transaction))
}

/// PATCH `/fee-transactions/{code}/custom-amount` - Override the amount owed.
async fn update_custom_amount(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCustomAmountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = LedgerService::new(state.unit_of_work())
        .override_custom_amount(&code, payload.custom_amount, payload.remarks)
        .await?;
    Ok(Json(transaction))
}

/// POST `/fee-transactions/{code}/cancel` - Cancel an unpaid transaction.
async fn cancel_transaction(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ValidatedJson(payload): ValidatedJson<CancelTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = LedgerService::new(state.unit_of_work())
        .cancel(&code, payload.remarks)
        .await?;
    Ok(Json(transaction))
}

/// Parses a student id path segment.
pub(crate) fn parse_student_id(raw: &str) -> Result<StudentId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("Invalid student id '{raw}'")))
}
