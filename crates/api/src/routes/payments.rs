//! Payment routes: recording with allocation, and reads.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use bursar_core::payment::{NewPayment, PaymentAllocationEngine, PaymentMode};
use bursar_db::repositories::{PaymentFilter, PaymentRepository};
use bursar_shared::{Money, StudentId};

use super::fee_transactions::parse_student_id;
use crate::{AppState, error::ApiError, extract::ValidatedJson};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route("/payments/student/{student_id}/history", get(payment_history))
        .route("/payments/{id}", get(get_payment))
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Paying student.
    pub student_id: StudentId,
    /// Amount received; must be positive, two decimals at most.
    pub amount: Money,
    /// Date the money was received (YYYY-MM-DD), not in the future.
    pub payment_date: NaiveDate,
    /// How the money was received.
    pub payment_mode: PaymentMode,
    /// Cheque number, UPI reference and the like.
    #[validate(length(max = 100))]
    pub reference_number: Option<String>,
    /// Free-form remarks.
    #[validate(length(max = 500))]
    pub remarks: Option<String>,
}

/// Query parameters for listing payments.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    /// Filter by student.
    pub student_id: Option<StudentId>,
    /// Paid on or after (YYYY-MM-DD).
    pub from_date: Option<NaiveDate>,
    /// Paid on or before (YYYY-MM-DD).
    pub to_date: Option<NaiveDate>,
}

/// POST `/payments` - Record a payment and allocate it oldest due first.
async fn create_payment(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = NewPayment {
        student_id: payload.student_id,
        amount: payload.amount,
        payment_date: payload.payment_date,
        payment_mode: payload.payment_mode,
        reference_number: payload.reference_number,
        remarks: payload.remarks,
    };

    let receipt = PaymentAllocationEngine::new(state.unit_of_work(), state.ledger.overpayment_policy)
        .allocate(payment, Utc::now().date_naive())
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET `/payments` - List payments, most recent first.
async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = PaymentRepository::new((*state.db).clone())
        .list(PaymentFilter {
            student_id: query.student_id,
            from_date: query.from_date,
            to_date: query.to_date,
        })
        .await?;
    Ok(Json(payments))
}

/// GET `/payments/student/{student_id}/history` - A student's payments.
async fn payment_history(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let student_id = parse_student_id(&student_id)?;
    let payments = PaymentRepository::new((*state.db).clone())
        .history(student_id)
        .await?;
    Ok(Json(payments))
}

/// GET `/payments/{id}` - Get one payment with its allocations.
async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: i32 = id
        .parse()
        .map_err(|_| ApiError::validation(format!("Invalid payment id '{id}'")))?;
    let payment = PaymentRepository::new((*state.db).clone()).get(id).await?;
    Ok(Json(payment))
}
