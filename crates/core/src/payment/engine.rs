//! Payment allocation engine.
//!
//! A payment is stored and spread over the student's outstanding
//! transactions in one unit of work. The outstanding rows are read with a
//! write lock, so a concurrent payment for the same student waits and then
//! sees the amounts this one left behind.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use bursar_shared::OverpaymentPolicy;

use super::types::{NewAllocation, NewPayment, PaymentWithAllocations};
use super::waterfall::plan_allocation;
use crate::ledger::{ErrorKind, FeeTransaction, LedgerError};
use crate::store::{FeeTransactionStore, PaymentStore, StudentDirectory, UnitOfWork, finish};

/// Applies incoming payments to outstanding obligations, oldest due first.
#[derive(Debug, Clone)]
pub struct PaymentAllocationEngine<U> {
    uow: U,
    policy: OverpaymentPolicy,
}

impl<U: UnitOfWork> PaymentAllocationEngine<U> {
    /// Creates an engine over `uow`.
    pub const fn new(uow: U, policy: OverpaymentPolicy) -> Self {
        Self { uow, policy }
    }

    /// Records `payment` and allocates it in its own unit of work.
    ///
    /// `today` bounds the payment date; nothing is persisted on failure.
    ///
    /// # Errors
    ///
    /// - `NonPositiveAmount` / `FutureDated` for an invalid payment
    /// - `StudentNotFound` if the student does not exist
    /// - `NoPendingTransactions` if nothing is outstanding
    /// - `Overpayment` if the amount exceeds what is owed and the policy rejects it
    /// - `ConcurrencyFailure` if the row locks could not be acquired in time
    pub async fn allocate(
        &self,
        payment: NewPayment,
        today: NaiveDate,
    ) -> Result<PaymentWithAllocations, LedgerError> {
        validate_payment(&payment, today)?;

        let mut session = self.uow.begin().await?;
        let result = allocate_in(&mut session, &payment, self.policy, Utc::now()).await;

        match finish(session, result).await {
            Ok(receipt) => {
                info!(
                    payment_id = receipt.payment.id,
                    student_id = %payment.student_id,
                    amount = %payment.amount,
                    allocations = receipt.allocations.len(),
                    unallocated = %receipt.unallocated_amount,
                    "payment allocated"
                );
                Ok(receipt)
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::Internal => {
                        tracing::error!(student_id = %payment.student_id, error = %err, "payment failed");
                    }
                    _ => warn!(student_id = %payment.student_id, error = %err, "payment rejected"),
                }
                Err(err)
            }
        }
    }
}

/// Checks what can be checked without storage.
///
/// # Errors
///
/// Returns `NonPositiveAmount` for a zero amount and `FutureDated` when the
/// payment date lies after `today`.
pub fn validate_payment(payment: &NewPayment, today: NaiveDate) -> Result<(), LedgerError> {
    if !payment.amount.is_positive() {
        return Err(LedgerError::NonPositiveAmount);
    }
    if payment.payment_date > today {
        return Err(LedgerError::FutureDated {
            date: payment.payment_date,
            today,
        });
    }
    Ok(())
}

/// Allocates `payment` inside an already open session.
///
/// The caller owns the session and decides whether to commit.
///
/// # Errors
///
/// See [`PaymentAllocationEngine::allocate`].
pub async fn allocate_in<S>(
    session: &mut S,
    payment: &NewPayment,
    policy: OverpaymentPolicy,
    now: DateTime<Utc>,
) -> Result<PaymentWithAllocations, LedgerError>
where
    S: StudentDirectory + FeeTransactionStore + PaymentStore + Send,
{
    if !session.student_exists(payment.student_id).await? {
        return Err(LedgerError::StudentNotFound(payment.student_id));
    }

    let mut outstanding: Vec<FeeTransaction> = session.lock_outstanding(payment.student_id).await?;
    if outstanding.is_empty() {
        return Err(LedgerError::NoPendingTransactions);
    }

    let plan = plan_allocation(payment.amount, &outstanding);
    if plan.unallocated.is_positive() {
        match policy {
            OverpaymentPolicy::Reject => {
                let owed = outstanding
                    .iter()
                    .fold(Decimal::new(0, 2), |acc, tx| acc + tx.outstanding().amount());
                return Err(LedgerError::Overpayment {
                    amount: payment.amount.amount(),
                    outstanding: owed,
                });
            }
            OverpaymentPolicy::LeaveUnapplied => {
                warn!(
                    student_id = %payment.student_id,
                    unallocated = %plan.unallocated,
                    "payment exceeds outstanding balance, surplus left unapplied"
                );
            }
        }
    }

    let stored = session.insert_payment(payment).await?;

    let mut allocations = Vec::with_capacity(plan.lines.len());
    for line in &plan.lines {
        let tx = outstanding
            .get_mut(line.index)
            .ok_or_else(|| LedgerError::Internal(format!("allocation line {} out of range", line.index)))?;

        tx.apply_allocation(line.amount, now)?;
        session.update_transaction(tx).await?;

        let allocation = session
            .insert_allocation(&NewAllocation {
                payment_id: stored.id,
                fee_transaction_code: tx.code.clone(),
                allocated_amount: line.amount,
                allocation_date: now,
            })
            .await?;
        allocations.push(allocation);
    }

    Ok(PaymentWithAllocations::new(stored, allocations))
}
