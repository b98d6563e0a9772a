//! Core business logic for Bursar.
//!
//! This crate contains the fee ledger with ZERO web or database dependencies.
//! Storage is reached only through the traits in [`store`].
//!
//! # Modules
//!
//! - `catalog` - Fee types, fee structures and billing frequencies
//! - `billing` - Transaction generation from fee structures
//! - `ledger` - Fee transaction state machine, errors and admin operations
//! - `payment` - Payment allocation (FIFO waterfall)
//! - `store` - Unit-of-work and repository traits, in-memory store

pub mod billing;
pub mod catalog;
pub mod ledger;
pub mod payment;
pub mod store;

pub use ledger::{ErrorKind, LedgerError};
