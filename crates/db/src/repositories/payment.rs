//! Payment read repository.
//!
//! Payments are only ever created by the allocation engine; this repository
//! lists them together with where their money went.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use bursar_core::LedgerError;
use bursar_core::payment::{PaymentAllocation, PaymentWithAllocations};
use bursar_shared::StudentId;

use super::convert;
use super::db_error::map_db_err;
use crate::entities::{payment_allocations, payments};

/// Filter options for listing payments.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    /// Filter by student.
    pub student_id: Option<StudentId>,
    /// Paid on or after this date.
    pub from_date: Option<NaiveDate>,
    /// Paid on or before this date.
    pub to_date: Option<NaiveDate>,
}

/// Payment repository for read operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists payments, most recent first, each with its allocations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: PaymentFilter) -> Result<Vec<PaymentWithAllocations>, LedgerError> {
        let mut query = payments::Entity::find()
            .filter(payments::Column::DeletedAt.is_null())
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::CreatedAt)
            .order_by_desc(payments::Column::Id);

        if let Some(student_id) = filter.student_id {
            query = query.filter(payments::Column::StudentId.eq(student_id.into_inner()));
        }

        if let Some(from_date) = filter.from_date {
            query = query.filter(payments::Column::PaymentDate.gte(from_date));
        }

        if let Some(to_date) = filter.to_date {
            query = query.filter(payments::Column::PaymentDate.lte(to_date));
        }

        let rows = query.all(&self.db).await.map_err(map_db_err)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|p| p.id).collect();
        let mut allocations = self.allocations_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let lines = allocations.remove(&row.id).unwrap_or_default();
                Ok(PaymentWithAllocations::new(convert::payment(row)?, lines))
            })
            .collect()
    }

    /// Payment history of one student, most recent first.
    ///
    /// An unknown student simply has no history.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(&self, student_id: StudentId) -> Result<Vec<PaymentWithAllocations>, LedgerError> {
        self.list(PaymentFilter {
            student_id: Some(student_id),
            ..PaymentFilter::default()
        })
        .await
    }

    /// Finds a payment by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PaymentNotFound`] if it does not exist.
    pub async fn get(&self, id: i32) -> Result<PaymentWithAllocations, LedgerError> {
        let row = payments::Entity::find_by_id(id)
            .filter(payments::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(LedgerError::PaymentNotFound(id))?;

        let lines = self
            .allocations_for(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();

        Ok(PaymentWithAllocations::new(convert::payment(row)?, lines))
    }

    /// Allocations of the given payments, grouped by payment, in walk order.
    async fn allocations_for(
        &self,
        payment_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<PaymentAllocation>>, LedgerError> {
        let rows = payment_allocations::Entity::find()
            .filter(payment_allocations::Column::PaymentId.is_in(payment_ids.iter().copied()))
            .order_by_asc(payment_allocations::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut grouped: HashMap<i32, Vec<PaymentAllocation>> = HashMap::new();
        for row in rows {
            let payment_id = row.payment_id;
            grouped
                .entry(payment_id)
                .or_default()
                .push(convert::allocation(row)?);
        }
        Ok(grouped)
    }
}
