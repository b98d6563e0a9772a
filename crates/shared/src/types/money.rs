//! Fixed-point money type.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and pins it to two decimal places,
//! matching the `decimal(10,2)` columns the ledger is stored in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places carried by every amount.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `decimal(10,2)` column can hold.
pub const MONEY_MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, MONEY_SCALE);

/// Errors raised when a decimal cannot be represented as [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount is below zero.
    #[error("amount cannot be negative: {0}")]
    Negative(Decimal),

    /// Amount carries more than two decimal places.
    #[error("amount has more than {MONEY_SCALE} decimal places: {0}")]
    TooPrecise(Decimal),

    /// Amount does not fit in a `decimal(10,2)` column.
    #[error("amount exceeds {MONEY_MAX}: {0}")]
    Overflow(Decimal),
}

/// A non-negative monetary amount with exactly two decimal places.
///
/// Serialized as a decimal string (`"500.00"`); deserializes from either a
/// JSON number or a string and rejects values that would lose precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));

    /// Creates a money amount, validating sign, scale, and range.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError`] if the amount is negative, has more than two
    /// decimal places, or exceeds [`MONEY_MAX`].
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount));
        }
        if amount.normalize().scale() > MONEY_SCALE {
            return Err(MoneyError::TooPrecise(amount));
        }
        if amount > MONEY_MAX {
            return Err(MoneyError::Overflow(amount));
        }

        let mut pinned = amount.abs();
        pinned.rescale(MONEY_SCALE);
        Ok(Self(pinned))
    }

    /// Creates a money amount from minor units (cents).
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError`] if the amount is negative or out of range.
    pub fn from_minor_units(cents: i64) -> Result<Self, MoneyError> {
        Self::new(Decimal::new(cents, MONEY_SCALE))
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        !self.0.is_zero()
    }

    /// Adds two amounts, returning `None` if the result leaves the column range.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Self::new(self.0.checked_add(other.0)?).ok()
    }

    /// Subtracts `other`, flooring the result at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            let mut diff = self.0 - other.0;
            diff.rescale(MONEY_SCALE);
            Self(diff)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Money {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str_exact(s.trim()).map_err(|e| e.to_string())?;
        Self::new(amount).map_err(|e| e.to_string())
    }
}
