//! Ledger error types.
//!
//! One taxonomy covers catalog lookups, billing, the transaction state
//! machine and payment allocation. Every variant maps to an API error code,
//! an HTTP status and a coarse [`ErrorKind`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use bursar_shared::{AppError, MoneyError, StudentId};

use super::status::TransactionStatus;

/// Coarse classification used by callers that only care about the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced record does not exist.
    NotFound,
    /// Request is well-formed but breaks a ledger rule.
    BusinessRule,
    /// Duplicate key on create.
    Conflict,
    /// Lock wait timed out or the database aborted the unit of work.
    Concurrency,
    /// Storage or programming failure.
    Internal,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Not Found ==========
    /// Student does not exist.
    #[error("Student '{0}' not found")]
    StudentNotFound(StudentId),

    /// Fee structure does not exist.
    #[error("Fee structure '{0}' not found")]
    FeeStructureNotFound(String),

    /// Fee type does not exist.
    #[error("Fee type '{0}' not found")]
    FeeTypeNotFound(String),

    /// Class does not exist.
    #[error("Class '{0}' not found")]
    ClassNotFound(String),

    /// Fee transaction does not exist.
    #[error("Fee transaction '{0}' not found")]
    TransactionNotFound(String),

    /// Payment does not exist.
    #[error("Payment with ID {0} not found")]
    PaymentNotFound(i32),

    // ========== Business Rules ==========
    /// Payment amount must be greater than zero.
    #[error("Payment amount must be greater than zero")]
    NonPositiveAmount,

    /// Payment date lies after today.
    #[error("Payment date {date} is in the future (today is {today})")]
    FutureDated {
        /// Date supplied by the caller.
        date: NaiveDate,
        /// Date the check ran against.
        today: NaiveDate,
    },

    /// Student has nothing outstanding to allocate against.
    #[error("No pending transactions found for this student")]
    NoPendingTransactions,

    /// Student has no active class enrollment.
    #[error("No active assignments found for student '{0}'")]
    NoActiveEnrollment(StudentId),

    /// No active fee structure matches the student's classes.
    #[error("No fee structures found for student's classes in academic year '{0}'")]
    NoFeeStructures(String),

    /// Billing month is not in `YYYY-MM` form.
    #[error("Invalid billing month '{0}', expected YYYY-MM")]
    InvalidBillingMonth(String),

    /// Paid transactions are immutable.
    #[error("Cannot modify a paid transaction")]
    TransactionPaid,

    /// Cancelled transactions are immutable.
    #[error("Cannot modify a cancelled transaction")]
    TransactionCancelled,

    /// Only a transaction with nothing paid can be cancelled.
    #[error("Only a pending transaction can be cancelled, found {0}")]
    CannotCancel(TransactionStatus),

    /// Custom amount would leave the transaction over-paid.
    #[error("Custom amount {custom} is below the amount already paid ({paid})")]
    CustomAmountBelowPaid {
        /// Requested override.
        custom: Decimal,
        /// Amount already allocated to the transaction.
        paid: Decimal,
    },

    /// Payment exceeds everything the student owes.
    #[error("Payment of {amount} exceeds the outstanding balance of {outstanding}")]
    Overpayment {
        /// Payment amount.
        amount: Decimal,
        /// Sum of outstanding amounts at the time of the payment.
        outstanding: Decimal,
    },

    /// Amount cannot be stored as money.
    #[error("Invalid amount: {0}")]
    InvalidMoney(#[from] MoneyError),

    // ========== Conflict ==========
    /// Code already in use.
    #[error("{entity} with code '{code}' already exists")]
    DuplicateCode {
        /// Kind of record, e.g. "Fee type".
        entity: &'static str,
        /// Conflicting code.
        code: String,
    },

    // ========== Concurrency ==========
    /// Lock wait timeout, deadlock or serialization failure.
    #[error("Concurrent modification detected, please retry: {0}")]
    ConcurrencyFailure(String),

    // ========== Internal ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error family.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::StudentNotFound(_)
            | Self::FeeStructureNotFound(_)
            | Self::FeeTypeNotFound(_)
            | Self::ClassNotFound(_)
            | Self::TransactionNotFound(_)
            | Self::PaymentNotFound(_) => ErrorKind::NotFound,

            Self::NonPositiveAmount
            | Self::FutureDated { .. }
            | Self::NoPendingTransactions
            | Self::NoActiveEnrollment(_)
            | Self::NoFeeStructures(_)
            | Self::InvalidBillingMonth(_)
            | Self::TransactionPaid
            | Self::TransactionCancelled
            | Self::CannotCancel(_)
            | Self::CustomAmountBelowPaid { .. }
            | Self::Overpayment { .. }
            | Self::InvalidMoney(_) => ErrorKind::BusinessRule,

            Self::DuplicateCode { .. } => ErrorKind::Conflict,

            Self::ConcurrencyFailure(_) => ErrorKind::Concurrency,

            Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::FeeStructureNotFound(_) => "FEE_STRUCTURE_NOT_FOUND",
            Self::FeeTypeNotFound(_) => "FEE_TYPE_NOT_FOUND",
            Self::ClassNotFound(_) => "CLASS_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::FutureDated { .. } => "FUTURE_DATED",
            Self::NoPendingTransactions => "NO_PENDING_TRANSACTIONS",
            Self::NoActiveEnrollment(_) => "NO_ACTIVE_ENROLLMENT",
            Self::NoFeeStructures(_) => "NO_FEE_STRUCTURES",
            Self::InvalidBillingMonth(_) => "INVALID_BILLING_MONTH",
            Self::TransactionPaid => "TRANSACTION_PAID",
            Self::TransactionCancelled => "TRANSACTION_CANCELLED",
            Self::CannotCancel(_) => "CANNOT_CANCEL",
            Self::CustomAmountBelowPaid { .. } => "CUSTOM_AMOUNT_BELOW_PAID",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::InvalidMoney(_) => "INVALID_AMOUNT",
            Self::DuplicateCode { .. } => "DUPLICATE_CODE",
            Self::ConcurrencyFailure(_) => "CONCURRENCY_FAILURE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::BusinessRule => 400,
            ErrorKind::Conflict | ErrorKind::Concurrency => 409,
            ErrorKind::Internal => 500,
        }
    }

    /// Returns true if the whole operation may be retried unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyFailure(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::BusinessRule => Self::BusinessRule(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Concurrency => Self::Concurrency(message),
            ErrorKind::Internal => match err {
                LedgerError::Database(_) => Self::Database(message),
                _ => Self::Internal(message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LedgerError::StudentNotFound(StudentId::from_uuid(uuid::Uuid::nil())), 404, "STUDENT_NOT_FOUND")]
    #[case(LedgerError::TransactionNotFound("TXN-1".into()), 404, "TRANSACTION_NOT_FOUND")]
    #[case(LedgerError::PaymentNotFound(7), 404, "PAYMENT_NOT_FOUND")]
    #[case(LedgerError::ClassNotFound("C9".into()), 404, "CLASS_NOT_FOUND")]
    #[case(LedgerError::NonPositiveAmount, 400, "NON_POSITIVE_AMOUNT")]
    #[case(LedgerError::NoPendingTransactions, 400, "NO_PENDING_TRANSACTIONS")]
    #[case(LedgerError::TransactionPaid, 400, "TRANSACTION_PAID")]
    #[case(LedgerError::DuplicateCode { entity: "Fee type", code: "TUITION".into() }, 409, "DUPLICATE_CODE")]
    #[case(LedgerError::ConcurrencyFailure("lock timeout".into()), 409, "CONCURRENCY_FAILURE")]
    #[case(LedgerError::Database("down".into()), 500, "DATABASE_ERROR")]
    fn test_status_and_code(#[case] err: LedgerError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.http_status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::ConcurrencyFailure("deadlock".into()).is_retryable());
        assert!(!LedgerError::NoPendingTransactions.is_retryable());
        assert!(!LedgerError::Database("x".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LedgerError::TransactionPaid.to_string(),
            "Cannot modify a paid transaction"
        );
        assert_eq!(
            LedgerError::NoPendingTransactions.to_string(),
            "No pending transactions found for this student"
        );
        let err = LedgerError::Overpayment {
            amount: Decimal::new(60000, 2),
            outstanding: Decimal::new(50000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Payment of 600.00 exceeds the outstanding balance of 500.00"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = LedgerError::ConcurrencyFailure("x".into()).into();
        assert!(app.is_retryable());
        assert_eq!(app.status_code(), 409);

        let app: AppError = LedgerError::Database("x".into()).into();
        assert_eq!(app.error_code(), "DATABASE_ERROR");

        let app: AppError = LedgerError::TransactionPaid.into();
        assert_eq!(app.status_code(), 400);
    }
}
