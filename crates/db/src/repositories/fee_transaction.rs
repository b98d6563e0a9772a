//! Fee transaction read repository.
//!
//! Writes go through [`super::unit_of_work::PgUnitOfWork`] so that they
//! take row locks; this repository only reads committed state.

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use bursar_core::LedgerError;
use bursar_core::ledger::{FeeTransaction, OutstandingSummary, TransactionStatus};
use bursar_shared::StudentId;

use super::convert;
use super::db_error::map_db_err;
use crate::entities::{fee_transactions, sea_orm_active_enums::FeeTransactionStatus};

/// Filter options for listing fee transactions.
#[derive(Debug, Clone, Default)]
pub struct FeeTransactionFilter {
    /// Filter by student.
    pub student_id: Option<StudentId>,
    /// Filter by status.
    pub status: Option<TransactionStatus>,
    /// Due on or after this date.
    pub from_date: Option<NaiveDate>,
    /// Due on or before this date.
    pub to_date: Option<NaiveDate>,
}

/// Fee transaction repository for read operations.
#[derive(Debug, Clone)]
pub struct FeeTransactionRepository {
    db: DatabaseConnection,
}

impl FeeTransactionRepository {
    /// Creates a new fee transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists transactions, oldest due date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: FeeTransactionFilter) -> Result<Vec<FeeTransaction>, LedgerError> {
        let mut query = fee_transactions::Entity::find()
            .filter(fee_transactions::Column::DeletedAt.is_null())
            .order_by_asc(fee_transactions::Column::DueDate)
            .order_by_asc(fee_transactions::Column::CreatedAt)
            .order_by_asc(fee_transactions::Column::Code);

        if let Some(student_id) = filter.student_id {
            query = query.filter(fee_transactions::Column::StudentId.eq(student_id.into_inner()));
        }

        if let Some(status) = filter.status {
            query = query.filter(fee_transactions::Column::Status.eq(FeeTransactionStatus::from(status)));
        }

        if let Some(from_date) = filter.from_date {
            query = query.filter(fee_transactions::Column::DueDate.gte(from_date));
        }

        if let Some(to_date) = filter.to_date {
            query = query.filter(fee_transactions::Column::DueDate.lte(to_date));
        }

        let rows = query.all(&self.db).await.map_err(map_db_err)?;
        rows.into_iter().map(convert::fee_transaction).collect()
    }

    /// Finds a transaction by code.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::TransactionNotFound`] if it does not exist.
    pub async fn get(&self, code: &str) -> Result<FeeTransaction, LedgerError> {
        let row = fee_transactions::Entity::find_by_id(code.to_string())
            .filter(fee_transactions::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| LedgerError::TransactionNotFound(code.to_string()))?;

        convert::fee_transaction(row)
    }

    /// Totals the student's PENDING and PARTIAL transactions.
    ///
    /// An unknown student simply owes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn outstanding(&self, student_id: StudentId) -> Result<OutstandingSummary, LedgerError> {
        let rows = fee_transactions::Entity::find()
            .filter(fee_transactions::Column::StudentId.eq(student_id.into_inner()))
            .filter(fee_transactions::Column::Status.is_in(
                TransactionStatus::OUTSTANDING.map(FeeTransactionStatus::from),
            ))
            .filter(fee_transactions::Column::DeletedAt.is_null())
            .order_by_asc(fee_transactions::Column::DueDate)
            .order_by_asc(fee_transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let transactions = rows
            .into_iter()
            .map(convert::fee_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OutstandingSummary::from_transactions(transactions))
    }
}
