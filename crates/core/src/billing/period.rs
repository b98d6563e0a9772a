//! Billing month parsing and due date computation.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::ledger::LedgerError;

/// Day of the billing month on which obligations fall due.
pub const DUE_DAY: u32 = 10;

/// A calendar month obligations are billed for, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    /// Creates a billing month.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBillingMonth` if `month` is outside 1-12 or the year
    /// is not four digits.
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return Err(LedgerError::InvalidBillingMonth(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Calendar month, 1-12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Due date of obligations billed in this month.
    #[must_use]
    pub fn due_date(self) -> NaiveDate {
        // Both parts were range-checked in `new`
        NaiveDate::from_ymd_opt(self.year, self.month, DUE_DAY).unwrap_or(NaiveDate::MIN)
    }

    /// Compact `YYYYMM` form used inside transaction codes.
    #[must_use]
    pub fn compact(self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for BillingMonth {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidBillingMonth(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_and_due_date() {
        let month: BillingMonth = "2024-01".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 1);
        assert_eq!(month.due_date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(month.compact(), "202401");
        assert_eq!(month.to_string(), "2024-01");
    }

    #[rstest]
    #[case("2024-13")]
    #[case("2024-00")]
    #[case("2024-1")]
    #[case("24-01")]
    #[case("2024/01")]
    #[case("2024-+1")]
    #[case("")]
    #[case("abcd-ef")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(matches!(
            input.parse::<BillingMonth>(),
            Err(LedgerError::InvalidBillingMonth(s)) if s == input
        ));
    }
}
