//! Domain primitive types.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{MONEY_MAX, MONEY_SCALE, Money, MoneyError};
