//! API error type and its JSON rendering.
//!
//! Every failure is answered as `{"error": "<CODE>", "message": "..."}`.
//! Retryable concurrency failures additionally carry `"retryable": true`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use bursar_core::{ErrorKind, LedgerError};
use bursar_shared::AppError;

/// Error returned by every handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure raised by the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Request or application failure outside the ledger.
    #[error(transparent)]
    App(#[from] AppError),
}

impl ApiError {
    /// Shorthand for a 400 validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::App(AppError::Validation(message.into()))
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            Self::Ledger(err) => err.http_status_code(),
            Self::App(err) => err.status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::App(err) => err.error_code(),
        }
    }

    /// True if the caller may retry the request unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(err) => err.is_retryable(),
            Self::App(err) => err.is_retryable(),
        }
    }

    fn is_internal(&self) -> bool {
        match self {
            Self::Ledger(err) => err.kind() == ErrorKind::Internal,
            Self::App(err) => err.status_code() >= 500,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if self.is_internal() {
            error!(error = %self, "request failed");
            "An internal error occurred".to_string()
        } else {
            if self.is_retryable() {
                warn!(error = %self, "retryable failure");
            }
            self.to_string()
        };

        let mut body = json!({
            "error": self.error_code(),
            "message": message,
        });
        if self.is_retryable() {
            body["retryable"] = json!(true);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(LedgerError::TransactionPaid.into(), StatusCode::BAD_REQUEST, "TRANSACTION_PAID")]
    #[case(LedgerError::PaymentNotFound(3).into(), StatusCode::NOT_FOUND, "PAYMENT_NOT_FOUND")]
    #[case(
        LedgerError::DuplicateCode { entity: "Fee type", code: "TUITION".into() }.into(),
        StatusCode::CONFLICT,
        "DUPLICATE_CODE"
    )]
    #[case(ApiError::validation("bad"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
    #[tokio::test]
    async fn test_error_mapping(
        #[case] err: ApiError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let (actual, body) = body_of(err).await;
        assert_eq!(actual, status);
        assert_eq!(body["error"], code);
        assert!(body.get("retryable").is_none());
    }

    #[tokio::test]
    async fn test_concurrency_failure_is_marked_retryable() {
        let (status, body) = body_of(LedgerError::ConcurrencyFailure("lock timeout".into()).into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONCURRENCY_FAILURE");
        assert_eq!(body["retryable"], true);
    }

    #[tokio::test]
    async fn test_database_details_are_not_leaked() {
        let (status, body) = body_of(LedgerError::Database("password=hunter2".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_paid_message_is_kept() {
        let (_, body) = body_of(LedgerError::TransactionPaid.into()).await;
        assert_eq!(body["message"], "Cannot modify a paid transaction");
    }
}
