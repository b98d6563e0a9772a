//! Payment intake and allocation against outstanding obligations.

pub mod engine;
pub mod types;
pub mod waterfall;

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod waterfall_props;

pub use engine::PaymentAllocationEngine;
pub use types::{NewAllocation, NewPayment, Payment, PaymentAllocation, PaymentMode, PaymentWithAllocations};
pub use waterfall::{AllocationLine, AllocationPlan, plan_allocation};
