//! Fee transaction ledger.
//!
//! This module implements the obligation side of the fee ledger:
//! - Transaction status and its derivation from paid vs. net amount
//! - The fee transaction aggregate and its guarded mutations
//! - Outstanding balance summaries
//! - The ledger error taxonomy
//! - Administrative operations (custom amount, cancellation)

pub mod error;
pub mod service;
pub mod status;
pub mod summary;
pub mod transaction;

#[cfg(test)]
mod status_props;

pub use error::{ErrorKind, LedgerError};
pub use service::LedgerService;
pub use status::TransactionStatus;
pub use summary::OutstandingSummary;
pub use transaction::FeeTransaction;
