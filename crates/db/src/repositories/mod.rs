//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Ledger mutations go through [`PgUnitOfWork`]; the repositories here cover
//! catalog maintenance and reads.

mod convert;
pub mod db_error;
pub mod fee_structure;
pub mod fee_transaction;
pub mod fee_type;
pub mod payment;
pub mod unit_of_work;

pub use db_error::{map_db_err, map_insert_err};
pub use fee_structure::{
    CreateFeeStructureInput, FeeStructureFilter, FeeStructureRepository, UpdateFeeStructureInput,
};
pub use fee_transaction::{FeeTransactionFilter, FeeTransactionRepository};
pub use fee_type::{CreateFeeTypeInput, FeeTypeRepository, UpdateFeeTypeInput};
pub use payment::{PaymentFilter, PaymentRepository};
pub use unit_of_work::{PgSession, PgUnitOfWork};
