//! FIFO waterfall: splits a payment across outstanding obligations.
//!
//! The plan is computed without touching storage so the allocation rules
//! can be tested on their own.

use bursar_shared::Money;

use crate::ledger::FeeTransaction;

/// Amount to apply to one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationLine {
    /// Index of the transaction in the input slice.
    pub index: usize,
    /// Amount to allocate.
    pub amount: Money,
}

/// Result of walking a payment down the outstanding list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    /// Lines in walk order. Never contains a zero amount.
    pub lines: Vec<AllocationLine>,
    /// Money left after every transaction was considered.
    pub unallocated: Money,
}

/// Walks `transactions` in order, applying `min(remaining, outstanding)` to
/// each until the payment is exhausted.
///
/// `transactions` must already be in allocation order (oldest due first).
#[must_use]
pub fn plan_allocation(amount: Money, transactions: &[FeeTransaction]) -> AllocationPlan {
    let mut remaining = amount;
    let mut lines = Vec::new();

    for (index, tx) in transactions.iter().enumerate() {
        if remaining.is_zero() {
            break;
        }
        if !tx.status.is_outstanding() {
            continue;
        }

        let allocated = remaining.min(tx.outstanding());
        if allocated.is_zero() {
            continue;
        }

        lines.push(AllocationLine {
            index,
            amount: allocated,
        });
        remaining = remaining.saturating_sub(allocated);
    }

    AllocationPlan {
        lines,
        unallocated: remaining,
    }
}
