//! Classification of Postgres failures into ledger errors.

use sea_orm::{DbErr, RuntimeErr};

use bursar_core::LedgerError;

/// `lock_not_available`, raised when `lock_timeout` expires.
pub const LOCK_NOT_AVAILABLE: &str = "55P03";
/// `deadlock_detected`.
pub const DEADLOCK_DETECTED: &str = "40P01";
/// `serialization_failure`.
pub const SERIALIZATION_FAILURE: &str = "40001";
/// `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Returns the SQLSTATE carried by a database error, if any.
#[must_use]
pub fn sqlstate(err: &DbErr) -> Option<String> {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return None,
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => {
            db_err.code().map(|code| code.into_owned())
        }
        _ => None,
    }
}

/// Maps a database error to the ledger taxonomy.
///
/// Lock timeouts, deadlocks and serialization failures become the retryable
/// [`LedgerError::ConcurrencyFailure`]; everything else is a
/// [`LedgerError::Database`] error.
#[must_use]
pub fn map_db_err(err: DbErr) -> LedgerError {
    match sqlstate(&err).as_deref() {
        Some(LOCK_NOT_AVAILABLE) => {
            LedgerError::ConcurrencyFailure("lock wait timeout exceeded".to_string())
        }
        Some(DEADLOCK_DETECTED) => LedgerError::ConcurrencyFailure("deadlock detected".to_string()),
        Some(SERIALIZATION_FAILURE) => {
            LedgerError::ConcurrencyFailure("serialization failure".to_string())
        }
        _ => LedgerError::Database(err.to_string()),
    }
}

/// Like [`map_db_err`], but turns a unique violation into
/// [`LedgerError::DuplicateCode`].
#[must_use]
pub fn map_insert_err(err: DbErr, entity: &'static str, code: &str) -> LedgerError {
    if sqlstate(&err).as_deref() == Some(UNIQUE_VIOLATION) {
        return LedgerError::DuplicateCode {
            entity,
            code: code.to_string(),
        };
    }
    map_db_err(err)
}
