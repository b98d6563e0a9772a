//! Fee transaction status and its derivation from paid vs. net amount.

use serde::{Deserialize, Serialize};
use std::fmt;

use bursar_shared::Money;

/// Fee transaction status.
///
/// Status follows the money, never the other way round:
/// - PENDING: nothing paid
/// - PARTIAL: something paid, less than net
/// - PAID: paid reaches net
/// - CANCELLED: terminal, set only by an administrative cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Nothing paid yet.
    Pending,
    /// Partly paid.
    Partial,
    /// Fully paid (immutable).
    Paid,
    /// Cancelled by an administrator (immutable).
    Cancelled,
}

impl TransactionStatus {
    /// Statuses that still accept payments.
    pub const OUTSTANDING: [Self; 2] = [Self::Pending, Self::Partial];

    /// Derives the status from the paid and net amounts.
    #[must_use]
    pub fn derive(paid: Money, net: Money) -> Self {
        if paid >= net {
            Self::Paid
        } else if paid.is_zero() {
            Self::Pending
        } else {
            Self::Partial
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Partial => "PARTIAL",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "PARTIAL" => Some(Self::Partial),
            "PAID" => Some(Self::Paid),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if payments can still be allocated.
    #[must_use]
    pub const fn is_outstanding(&self) -> bool {
        matches!(self, Self::Pending | Self::Partial)
    }

    /// Returns true if the transaction can no longer change.
    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
