//! In-memory ledger store.
//!
//! A unit of work takes the store mutex for its whole lifetime and works on
//! a private copy of the state, which replaces the shared state on commit.
//! Units of work are therefore fully serialized, which is a coarser form of
//! the row locks the Postgres store takes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use bursar_shared::StudentId;

use super::{FeeCatalog, FeeTransactionStore, LedgerSession, PaymentStore, StudentDirectory, UnitOfWork};
use crate::catalog::FeeStructure;
use crate::ledger::{FeeTransaction, LedgerError};
use crate::payment::{NewAllocation, NewPayment, Payment, PaymentAllocation};

#[derive(Debug, Clone, Default)]
struct LedgerState {
    students: HashMap<StudentId, Vec<String>>,
    structures: Vec<FeeStructure>,
    // code -> (insertion sequence, transaction)
    transactions: BTreeMap<String, (u64, FeeTransaction)>,
    payments: Vec<Payment>,
    allocations: Vec<PaymentAllocation>,
    next_sequence: u64,
}

/// Shared in-memory ledger. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a student actively enrolled in `class_codes`.
    pub async fn add_student<I, S>(&self, student_id: StudentId, class_codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes = class_codes.into_iter().map(Into::into).collect();
        self.state.lock().await.students.insert(student_id, codes);
    }

    /// Adds a fee structure to the catalog.
    pub async fn add_structure(&self, structure: FeeStructure) {
        self.state.lock().await.structures.push(structure);
    }

    /// Returns the committed transaction with `code`.
    pub async fn transaction(&self, code: &str) -> Option<FeeTransaction> {
        self.state
            .lock()
            .await
            .transactions
            .get(code)
            .map(|(_, tx)| tx.clone())
    }

    /// Returns all committed transactions of a student, oldest due first.
    pub async fn transactions_for(&self, student_id: StudentId) -> Vec<FeeTransaction> {
        let state = self.state.lock().await;
        sorted(
            state
                .transactions
                .values()
                .filter(|(_, tx)| tx.student_id == student_id),
        )
    }

    /// Returns all committed payments.
    pub async fn payments(&self) -> Vec<Payment> {
        self.state.lock().await.payments.clone()
    }

    /// Returns all committed allocations.
    pub async fn allocations(&self) -> Vec<PaymentAllocation> {
        self.state.lock().await.allocations.clone()
    }
}

fn sorted<'a>(rows: impl Iterator<Item = &'a (u64, FeeTransaction)>) -> Vec<FeeTransaction> {
    let mut rows: Vec<_> = rows.collect();
    rows.sort_by(|(seq_a, a), (seq_b, b)| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| seq_a.cmp(seq_b))
    });
    rows.into_iter().map(|(_, tx)| tx.clone()).collect()
}

fn next_id(len: usize) -> Result<i32, LedgerError> {
    i32::try_from(len + 1).map_err(|_| LedgerError::Internal("id sequence exhausted".into()))
}

#[async_trait]
impl UnitOfWork for MemoryLedger {
    type Session = MemorySession;

    async fn begin(&self) -> Result<MemorySession, LedgerError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(MemorySession { guard, staged })
    }
}

/// A unit of work over [`MemoryLedger`].
#[derive(Debug)]
pub struct MemorySession {
    guard: OwnedMutexGuard<LedgerState>,
    staged: LedgerState,
}

#[async_trait]
impl LedgerSession for MemorySession {
    async fn commit(self) -> Result<(), LedgerError> {
        let Self { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[async_trait]
impl StudentDirectory for MemorySession {
    async fn student_exists(&mut self, student_id: StudentId) -> Result<bool, LedgerError> {
        Ok(self.staged.students.contains_key(&student_id))
    }

    async fn active_class_codes(&mut self, student_id: StudentId) -> Result<Vec<String>, LedgerError> {
        Ok(self.staged.students.get(&student_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl FeeCatalog for MemorySession {
    async fn structures_for(
        &mut self,
        class_codes: &[String],
        academic_year: &str,
    ) -> Result<Vec<FeeStructure>, LedgerError> {
        let mut found: Vec<_> = self
            .staged
            .structures
            .iter()
            .filter(|s| class_codes.iter().any(|c| s.applies_to(c, academic_year)))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(found)
    }
}

#[async_trait]
impl FeeTransactionStore for MemorySession {
    async fn transaction_exists(&mut self, code: &str) -> Result<bool, LedgerError> {
        Ok(self.staged.transactions.contains_key(code))
    }

    async fn insert_transaction(&mut self, transaction: &FeeTransaction) -> Result<(), LedgerError> {
        if self.staged.transactions.contains_key(&transaction.code) {
            return Err(LedgerError::DuplicateCode {
                entity: "Fee transaction",
                code: transaction.code.clone(),
            });
        }
        let sequence = self.staged.next_sequence;
        self.staged.next_sequence += 1;
        self.staged
            .transactions
            .insert(transaction.code.clone(), (sequence, transaction.clone()));
        Ok(())
    }

    async fn lock_transaction(&mut self, code: &str) -> Result<Option<FeeTransaction>, LedgerError> {
        Ok(self.staged.transactions.get(code).map(|(_, tx)| tx.clone()))
    }

    async fn lock_outstanding(&mut self, student_id: StudentId) -> Result<Vec<FeeTransaction>, LedgerError> {
        Ok(sorted(self.staged.transactions.values().filter(|(_, tx)| {
            tx.student_id == student_id && tx.status.is_outstanding()
        })))
    }

    async fn update_transaction(&mut self, transaction: &FeeTransaction) -> Result<(), LedgerError> {
        let (_, stored) = self
            .staged
            .transactions
            .get_mut(&transaction.code)
            .ok_or_else(|| LedgerError::TransactionNotFound(transaction.code.clone()))?;
        *stored = transaction.clone();
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for MemorySession {
    async fn insert_payment(&mut self, payment: &NewPayment) -> Result<Payment, LedgerError> {
        let stored = Payment {
            id: next_id(self.staged.payments.len())?,
            student_id: payment.student_id,
            amount: payment.amount,
            payment_date: payment.payment_date,
            payment_mode: payment.payment_mode,
            reference_number: payment.reference_number.clone(),
            remarks: payment.remarks.clone(),
            created_at: chrono::Utc::now(),
        };
        self.staged.payments.push(stored.clone());
        Ok(stored)
    }

    async fn insert_allocation(&mut self, allocation: &NewAllocation) -> Result<PaymentAllocation, LedgerError> {
        let stored = PaymentAllocation {
            id: next_id(self.staged.allocations.len())?,
            payment_id: allocation.payment_id,
            fee_transaction_code: allocation.fee_transaction_code.clone(),
            allocated_amount: allocation.allocated_amount,
            allocation_date: allocation.allocation_date,
        };
        self.staged.allocations.push(stored.clone());
        Ok(stored)
    }
}
