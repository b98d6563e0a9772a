//! Fee catalog domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

use bursar_shared::Money;

/// Which kind of activity a fee type applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeApplicability {
    /// Regular classes.
    Curricular,
    /// Clubs, sports and similar.
    ExtraCurricular,
    /// Either.
    Both,
}

impl FeeApplicability {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Curricular => "CURRICULAR",
            Self::ExtraCurricular => "EXTRA_CURRICULAR",
            Self::Both => "BOTH",
        }
    }
}

/// How often a fee structure bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeFrequency {
    /// Every month.
    Monthly,
    /// January, April, July and October.
    Quarterly,
    /// April and October.
    HalfYearly,
    /// April.
    Annual,
    /// Once per academic year, at its start in April.
    OneTime,
}

impl FeeFrequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::HalfYearly => "HALF_YEARLY",
            Self::Annual => "ANNUAL",
            Self::OneTime => "ONE_TIME",
        }
    }

    /// Parses a frequency from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MONTHLY" => Some(Self::Monthly),
            "QUARTERLY" => Some(Self::Quarterly),
            "HALF_YEARLY" => Some(Self::HalfYearly),
            "ANNUAL" => Some(Self::Annual),
            "ONE_TIME" => Some(Self::OneTime),
            _ => None,
        }
    }
}

impl fmt::Display for FeeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category of fee, e.g. tuition or transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeType {
    /// Unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Activity the fee applies to.
    pub applicable_to: FeeApplicability,
    /// Inactive types are kept for history but not offered.
    pub is_active: bool,
}

/// One recurring charge for a class in an academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeStructure {
    /// Unique code.
    pub code: String,
    /// Fee type this structure charges for.
    pub fee_type_code: String,
    /// Class the structure applies to.
    pub class_code: String,
    /// Billing frequency.
    pub frequency: FeeFrequency,
    /// Amount billed each time the structure fires.
    pub amount: Money,
    /// Academic year, e.g. "2024-2025".
    pub academic_year: String,
    /// Only active structures are billed.
    pub is_active: bool,
}

impl FeeStructure {
    /// Returns true if this structure should be billed for `class_code` in
    /// `academic_year`.
    #[must_use]
    pub fn applies_to(&self, class_code: &str, academic_year: &str) -> bool {
        self.is_active && self.class_code == class_code && self.academic_year == academic_year
    }
}
