//! Deterministic transaction code derivation.

use bursar_shared::StudentId;

use super::period::BillingMonth;

/// Prefix shared by all fee transaction codes.
pub const TRANSACTION_CODE_PREFIX: &str = "TXN";

/// Derives the code of the obligation billed to `student_id` for
/// `fee_structure_code` in `month`.
///
/// The code is the primary key of the transaction, so generating the same
/// month twice finds the existing rows instead of creating new ones.
#[must_use]
pub fn transaction_code(student_id: StudentId, month: BillingMonth, fee_structure_code: &str) -> String {
    format!(
        "{TRANSACTION_CODE_PREFIX}-{student_id}-{}-{fee_structure_code}",
        month.compact()
    )
}
