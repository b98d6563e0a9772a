//! Billing: turns fee structures into dated obligations.
//!
//! - `period` - billing month parsing and due dates
//! - `code` - deterministic transaction codes
//! - `generator` - the transaction generator

pub mod code;
pub mod generator;
pub mod period;

#[cfg(test)]
mod code_props;
#[cfg(test)]
mod generator_tests;

pub use code::{TRANSACTION_CODE_PREFIX, transaction_code};
pub use generator::{GenerateRequest, TransactionGenerator};
pub use period::{BillingMonth, DUE_DAY};
