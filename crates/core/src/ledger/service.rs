//! Administrative ledger operations on single transactions.

use chrono::Utc;
use tracing::{info, warn};

use bursar_shared::Money;

use super::error::LedgerError;
use super::transaction::FeeTransaction;
use crate::store::{FeeTransactionStore, LedgerSession, UnitOfWork, finish};

/// Custom-amount overrides and cancellations.
///
/// Each call locks the target row for the length of its unit of work, so it
/// serializes with payment allocation against the same transaction.
#[derive(Debug, Clone)]
pub struct LedgerService<U> {
    uow: U,
}

impl<U: UnitOfWork> LedgerService<U> {
    /// Creates a service over `uow`.
    pub const fn new(uow: U) -> Self {
        Self { uow }
    }

    /// Replaces the amount owed on a transaction.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if `code` does not exist
    /// - `TransactionPaid` / `TransactionCancelled` if the row is immutable
    /// - `CustomAmountBelowPaid` if the override is below what was paid
    pub async fn override_custom_amount(
        &self,
        code: &str,
        custom_amount: Money,
        remarks: Option<String>,
    ) -> Result<FeeTransaction, LedgerError> {
        self.mutate(code, |tx| tx.override_amount(custom_amount, remarks, Utc::now()))
            .await
            .inspect(|tx| info!(code = %tx.code, net_amount = %tx.net_amount, status = %tx.status, "custom amount set"))
    }

    /// Cancels a transaction nothing has been paid against.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if `code` does not exist
    /// - `CannotCancel` unless the row is PENDING
    pub async fn cancel(&self, code: &str, remarks: Option<String>) -> Result<FeeTransaction, LedgerError> {
        self.mutate(code, |tx| tx.cancel(remarks, Utc::now()))
            .await
            .inspect(|tx| info!(code = %tx.code, "fee transaction cancelled"))
    }

    async fn mutate<F>(&self, code: &str, apply: F) -> Result<FeeTransaction, LedgerError>
    where
        F: FnOnce(&mut FeeTransaction) -> Result<(), LedgerError> + Send,
    {
        let mut session = self.uow.begin().await?;
        let result = mutate_in(&mut session, code, apply).await;
        finish(session, result)
            .await
            .inspect_err(|err| warn!(code = %code, error = %err, "transaction update rejected"))
    }
}

async fn mutate_in<S, F>(session: &mut S, code: &str, apply: F) -> Result<FeeTransaction, LedgerError>
where
    S: LedgerSession,
    F: FnOnce(&mut FeeTransaction) -> Result<(), LedgerError> + Send,
{
    let mut tx = session
        .lock_transaction(code)
        .await?
        .ok_or_else(|| LedgerError::TransactionNotFound(code.to_string()))?;

    apply(&mut tx)?;
    session.update_transaction(&tx).await?;
    Ok(tx)
}
