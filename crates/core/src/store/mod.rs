//! Storage seams for the ledger services.
//!
//! Services never talk to a database directly. They receive a session that
//! implements the store traits below and carries one atomic unit of work;
//! whatever the session reads with a `lock_*` method stays locked until the
//! session is committed or rolled back.

pub mod memory;

use async_trait::async_trait;

use bursar_shared::StudentId;

use crate::catalog::FeeStructure;
use crate::ledger::{FeeTransaction, LedgerError};
use crate::payment::{NewAllocation, NewPayment, Payment, PaymentAllocation};

pub use memory::{MemoryLedger, MemorySession};

/// Read access to students and their enrollments.
#[async_trait]
pub trait StudentDirectory {
    /// Returns true if the student exists.
    async fn student_exists(&mut self, student_id: StudentId) -> Result<bool, LedgerError>;

    /// Distinct class codes the student is actively enrolled in.
    async fn active_class_codes(&mut self, student_id: StudentId) -> Result<Vec<String>, LedgerError>;
}

/// Read access to the fee catalog.
#[async_trait]
pub trait FeeCatalog {
    /// Active structures for any of `class_codes` in `academic_year`,
    /// ordered by code.
    async fn structures_for(
        &mut self,
        class_codes: &[String],
        academic_year: &str,
    ) -> Result<Vec<FeeStructure>, LedgerError>;
}

/// Fee transaction persistence.
#[async_trait]
pub trait FeeTransactionStore {
    /// Returns true if a transaction with `code` exists.
    async fn transaction_exists(&mut self, code: &str) -> Result<bool, LedgerError>;

    /// Inserts a new transaction.
    ///
    /// A duplicate code must surface as [`LedgerError::DuplicateCode`].
    async fn insert_transaction(&mut self, transaction: &FeeTransaction) -> Result<(), LedgerError>;

    /// Loads one transaction and write-locks it.
    async fn lock_transaction(&mut self, code: &str) -> Result<Option<FeeTransaction>, LedgerError>;

    /// Loads and write-locks every PENDING or PARTIAL transaction of the
    /// student, ordered by due date, then creation time, then code.
    async fn lock_outstanding(&mut self, student_id: StudentId) -> Result<Vec<FeeTransaction>, LedgerError>;

    /// Persists paid amount, net amount, status and remarks of a locked
    /// transaction.
    async fn update_transaction(&mut self, transaction: &FeeTransaction) -> Result<(), LedgerError>;
}

/// Payment persistence. Payments and allocations are write-once.
#[async_trait]
pub trait PaymentStore {
    /// Inserts a payment and returns it with its assigned id.
    async fn insert_payment(&mut self, payment: &NewPayment) -> Result<Payment, LedgerError>;

    /// Inserts an allocation and returns it with its assigned id.
    async fn insert_allocation(&mut self, allocation: &NewAllocation) -> Result<PaymentAllocation, LedgerError>;
}

/// One atomic unit of work.
///
/// Dropping a session without committing discards its writes.
#[async_trait]
pub trait LedgerSession:
    StudentDirectory + FeeCatalog + FeeTransactionStore + PaymentStore + Send
{
    /// Makes every write of the session durable and releases its locks.
    async fn commit(self) -> Result<(), LedgerError>;

    /// Discards every write of the session and releases its locks.
    async fn rollback(self) -> Result<(), LedgerError>;
}

/// Opens sessions.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Session type produced by [`UnitOfWork::begin`].
    type Session: LedgerSession;

    /// Starts a unit of work.
    async fn begin(&self) -> Result<Self::Session, LedgerError>;
}

/// Commits `session` if `result` is `Ok`, rolls it back otherwise.
///
/// A failed rollback is logged and the original error is returned.
///
/// # Errors
///
/// Returns the error in `result`, or the commit error.
pub async fn finish<S, T>(session: S, result: Result<T, LedgerError>) -> Result<T, LedgerError>
where
    S: LedgerSession,
{
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = session.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
