//! Fee catalog: fee types, fee structures and their billing frequencies.

pub mod frequency;
pub mod types;

#[cfg(test)]
mod frequency_props;

pub use types::{FeeApplicability, FeeFrequency, FeeStructure, FeeType};
