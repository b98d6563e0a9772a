//! Transaction generator.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use bursar_shared::StudentId;

use super::code::transaction_code;
use super::period::BillingMonth;
use crate::ledger::{FeeTransaction, LedgerError};
use crate::store::{FeeCatalog, FeeTransactionStore, StudentDirectory, UnitOfWork, finish};

/// Input of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Student to bill.
    pub student_id: StudentId,
    /// Month to bill for.
    pub month: BillingMonth,
    /// Academic year whose structures apply, e.g. "2023-2024".
    pub academic_year: String,
}

/// Materializes fee transactions for a student and billing month.
///
/// Generation is idempotent: transactions whose code already exists are
/// skipped, so running the same month twice creates nothing the second time.
#[derive(Debug, Clone)]
pub struct TransactionGenerator<U> {
    uow: U,
}

impl<U: UnitOfWork> TransactionGenerator<U> {
    /// Creates a generator over `uow`.
    pub const fn new(uow: U) -> Self {
        Self { uow }
    }

    /// Generates the month's obligations in one unit of work and returns
    /// the transactions actually created.
    ///
    /// # Errors
    ///
    /// - `StudentNotFound` if the student does not exist
    /// - `NoActiveEnrollment` if the student is not enrolled anywhere
    /// - `NoFeeStructures` if no active structure matches
    /// - `DuplicateCode` if a concurrent run inserted the same code first
    pub async fn generate(&self, request: &GenerateRequest) -> Result<Vec<FeeTransaction>, LedgerError> {
        let mut session = self.uow.begin().await?;
        let result = generate_in(&mut session, request, Utc::now()).await;

        match finish(session, result).await {
            Ok(created) => {
                info!(
                    student_id = %request.student_id,
                    month = %request.month,
                    academic_year = %request.academic_year,
                    created = created.len(),
                    "fee transactions generated"
                );
                Ok(created)
            }
            Err(err) => {
                warn!(student_id = %request.student_id, month = %request.month, error = %err, "generation failed");
                Err(err)
            }
        }
    }
}

/// Generates obligations inside an already open session.
///
/// # Errors
///
/// See [`TransactionGenerator::generate`].
pub async fn generate_in<S>(
    session: &mut S,
    request: &GenerateRequest,
    now: DateTime<Utc>,
) -> Result<Vec<FeeTransaction>, LedgerError>
where
    S: StudentDirectory + FeeCatalog + FeeTransactionStore + Send,
{
    let student_id = request.student_id;
    if !session.student_exists(student_id).await? {
        return Err(LedgerError::StudentNotFound(student_id));
    }

    let mut class_codes = session.active_class_codes(student_id).await?;
    class_codes.sort_unstable();
    class_codes.dedup();
    if class_codes.is_empty() {
        return Err(LedgerError::NoActiveEnrollment(student_id));
    }

    let structures = session
        .structures_for(&class_codes, &request.academic_year)
        .await?;
    if structures.is_empty() {
        return Err(LedgerError::NoFeeStructures(request.academic_year.clone()));
    }

    let due_date = request.month.due_date();
    let mut created = Vec::new();

    for structure in &structures {
        if !structure.frequency.bills_in_month(request.month.month()) {
            debug!(structure = %structure.code, frequency = %structure.frequency, "not billed this month");
            continue;
        }

        let code = transaction_code(student_id, request.month, &structure.code);
        if session.transaction_exists(&code).await? {
            debug!(code = %code, "already generated");
            continue;
        }

        let transaction = FeeTransaction::from_structure(code, student_id, structure, due_date, now);
        session.insert_transaction(&transaction).await?;
        created.push(transaction);
    }

    Ok(created)
}
