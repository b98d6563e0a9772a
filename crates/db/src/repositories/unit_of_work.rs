//! Postgres unit of work for the ledger services.
//!
//! Every unit of work is one database transaction. `lock_timeout` is set
//! with `SET LOCAL` so it is scoped to that transaction only, and rows read
//! through the `lock_*` methods are taken `FOR UPDATE`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use bursar_core::catalog::FeeStructure;
use bursar_core::ledger::{FeeTransaction, LedgerError, TransactionStatus};
use bursar_core::payment::{NewAllocation, NewPayment, Payment, PaymentAllocation};
use bursar_core::store::{
    FeeCatalog, FeeTransactionStore, LedgerSession, PaymentStore, StudentDirectory, UnitOfWork,
};
use bursar_shared::StudentId;

use super::convert;
use super::db_error::{map_db_err, map_insert_err};
use crate::entities::{
    class_sections, fee_structures, fee_transactions, payment_allocations, payments,
    sea_orm_active_enums::{AssignmentStatus, FeeTransactionStatus},
    student_assignments, students,
};

/// Opens [`PgSession`]s on a connection pool.
#[derive(Debug, Clone)]
pub struct PgUnitOfWork {
    db: DatabaseConnection,
    lock_timeout_ms: u64,
}

impl PgUnitOfWork {
    /// Creates a unit of work factory.
    ///
    /// `lock_timeout_ms` bounds how long a session waits for a row lock
    /// before failing with [`LedgerError::ConcurrencyFailure`].
    #[must_use]
    pub const fn new(db: DatabaseConnection, lock_timeout_ms: u64) -> Self {
        Self { db, lock_timeout_ms }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    type Session = PgSession;

    async fn begin(&self) -> Result<PgSession, LedgerError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Integer only, so safe to format into the statement
        let sql = format!("SET LOCAL lock_timeout = '{}ms'", self.lock_timeout_ms);
        txn.execute_unprepared(&sql).await.map_err(map_db_err)?;

        Ok(PgSession { txn })
    }
}

/// One open database transaction.
///
/// Dropping the session without committing rolls the transaction back.
pub struct PgSession {
    txn: DatabaseTransaction,
}

impl std::fmt::Debug for PgSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgSession").finish_non_exhaustive()
    }
}

#[async_trait]
impl StudentDirectory for PgSession {
    async fn student_exists(&mut self, student_id: StudentId) -> Result<bool, LedgerError> {
        let student = students::Entity::find_by_id(student_id.into_inner())
            .one(&self.txn)
            .await
            .map_err(map_db_err)?;
        Ok(student.is_some())
    }

    async fn active_class_codes(&mut self, student_id: StudentId) -> Result<Vec<String>, LedgerError> {
        let assignments = student_assignments::Entity::find()
            .filter(student_assignments::Column::StudentId.eq(student_id.into_inner()))
            .filter(student_assignments::Column::Status.eq(AssignmentStatus::Active))
            .find_also_related(class_sections::Entity)
            .all(&self.txn)
            .await
            .map_err(map_db_err)?;

        let mut codes: Vec<String> = assignments
            .into_iter()
            .filter_map(|(_, section)| section.map(|s| s.class_code))
            .collect();
        codes.sort();
        codes.dedup();
        Ok(codes)
    }
}

#[async_trait]
impl FeeCatalog for PgSession {
    async fn structures_for(
        &mut self,
        class_codes: &[String],
        academic_year: &str,
    ) -> Result<Vec<FeeStructure>, LedgerError> {
        if class_codes.is_empty() {
            return Ok(Vec::new());
        }

        let rows = fee_structures::Entity::find()
            .filter(fee_structures::Column::ClassCode.is_in(class_codes.iter().map(String::as_str)))
            .filter(fee_structures::Column::AcademicYear.eq(academic_year))
            .filter(fee_structures::Column::IsActive.eq(true))
            .filter(fee_structures::Column::DeletedAt.is_null())
            .order_by_asc(fee_structures::Column::Code)
            .all(&self.txn)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(convert::fee_structure).collect()
    }
}

#[async_trait]
impl FeeTransactionStore for PgSession {
    async fn transaction_exists(&mut self, code: &str) -> Result<bool, LedgerError> {
        // Soft-deleted rows still own their code
        let row = fee_transactions::Entity::find_by_id(code.to_string())
            .one(&self.txn)
            .await
            .map_err(map_db_err)?;
        Ok(row.is_some())
    }

    async fn insert_transaction(&mut self, transaction: &FeeTransaction) -> Result<(), LedgerError> {
        let row = fee_transactions::ActiveModel {
            code: Set(transaction.code.clone()),
            student_id: Set(transaction.student_id.into_inner()),
            fee_structure_code: Set(transaction.fee_structure_code.clone()),
            due_date: Set(transaction.due_date),
            base_amount: Set(transaction.base_amount.amount()),
            custom_amount: Set(transaction.custom_amount.map(bursar_shared::Money::amount)),
            net_amount: Set(transaction.net_amount.amount()),
            paid_amount: Set(transaction.paid_amount.amount()),
            status: Set(FeeTransactionStatus::from(transaction.status)),
            remarks: Set(transaction.remarks.clone()),
            created_at: Set(transaction.created_at.into()),
            updated_at: Set(transaction.updated_at.into()),
            deleted_at: Set(None),
        };

        fee_transactions::Entity::insert(row)
            .exec_without_returning(&self.txn)
            .await
            .map_err(|e| map_insert_err(e, "Fee transaction", &transaction.code))?;
        Ok(())
    }

    async fn lock_transaction(&mut self, code: &str) -> Result<Option<FeeTransaction>, LedgerError> {
        let row = fee_transactions::Entity::find_by_id(code.to_string())
            .filter(fee_transactions::Column::DeletedAt.is_null())
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(map_db_err)?;

        row.map(convert::fee_transaction).transpose()
    }

    async fn lock_outstanding(&mut self, student_id: StudentId) -> Result<Vec<FeeTransaction>, LedgerError> {
        let rows = fee_transactions::Entity::find()
            .filter(fee_transactions::Column::StudentId.eq(student_id.into_inner()))
            .filter(fee_transactions::Column::Status.is_in(
                TransactionStatus::OUTSTANDING.map(FeeTransactionStatus::from),
            ))
            .filter(fee_transactions::Column::DeletedAt.is_null())
            .order_by_asc(fee_transactions::Column::DueDate)
            .order_by_asc(fee_transactions::Column::CreatedAt)
            .order_by_asc(fee_transactions::Column::Code)
            .lock_exclusive()
            .all(&self.txn)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(convert::fee_transaction).collect()
    }

    async fn update_transaction(&mut self, transaction: &FeeTransaction) -> Result<(), LedgerError> {
        let row = fee_transactions::ActiveModel {
            code: Set(transaction.code.clone()),
            custom_amount: Set(transaction.custom_amount.map(bursar_shared::Money::amount)),
            net_amount: Set(transaction.net_amount.amount()),
            paid_amount: Set(transaction.paid_amount.amount()),
            status: Set(FeeTransactionStatus::from(transaction.status)),
            remarks: Set(transaction.remarks.clone()),
            updated_at: Set(transaction.updated_at.into()),
            ..Default::default()
        };

        row.update(&self.txn).await.map_err(map_db_err)?;
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for PgSession {
    async fn insert_payment(&mut self, payment: &NewPayment) -> Result<Payment, LedgerError> {
        let now = Utc::now().into();
        let row = payments::ActiveModel {
            id: NotSet,
            student_id: Set(payment.student_id.into_inner()),
            amount: Set(payment.amount.amount()),
            payment_date: Set(payment.payment_date),
            payment_mode: Set(payment.payment_mode.into()),
            reference_number: Set(payment.reference_number.clone()),
            remarks: Set(payment.remarks.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = row.insert(&self.txn).await.map_err(map_db_err)?;
        convert::payment(model)
    }

    async fn insert_allocation(&mut self, allocation: &NewAllocation) -> Result<PaymentAllocation, LedgerError> {
        let now = Utc::now().into();
        let row = payment_allocations::ActiveModel {
            id: NotSet,
            payment_id: Set(allocation.payment_id),
            fee_transaction_code: Set(allocation.fee_transaction_code.clone()),
            allocated_amount: Set(allocation.allocated_amount.amount()),
            allocation_date: Set(allocation.allocation_date.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = row.insert(&self.txn).await.map_err(map_db_err)?;
        convert::allocation(model)
    }
}

#[async_trait]
impl LedgerSession for PgSession {
    async fn commit(self) -> Result<(), LedgerError> {
        self.txn.commit().await.map_err(map_db_err)
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        self.txn.rollback().await.map_err(map_db_err)
    }
}
