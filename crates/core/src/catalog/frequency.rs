//! Frequency filter: decides whether a structure bills in a calendar month.

use super::types::FeeFrequency;

impl FeeFrequency {
    /// Calendar months (1-12) in which this frequency bills.
    #[must_use]
    pub const fn billing_months(self) -> &'static [u32] {
        match self {
            Self::Monthly => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            Self::Quarterly => &[1, 4, 7, 10],
            Self::HalfYearly => &[4, 10],
            // The academic year starts in April
            Self::Annual | Self::OneTime => &[4],
        }
    }

    /// Returns true if a structure with this frequency bills in `month`.
    #[must_use]
    pub fn bills_in_month(self, month: u32) -> bool {
        self.billing_months().contains(&month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FeeFrequency::Quarterly, 1, true)]
    #[case(FeeFrequency::Quarterly, 2, false)]
    #[case(FeeFrequency::Quarterly, 7, true)]
    #[case(FeeFrequency::HalfYearly, 4, true)]
    #[case(FeeFrequency::HalfYearly, 10, true)]
    #[case(FeeFrequency::HalfYearly, 1, false)]
    #[case(FeeFrequency::Annual, 4, true)]
    #[case(FeeFrequency::Annual, 5, false)]
    #[case(FeeFrequency::OneTime, 4, true)]
    #[case(FeeFrequency::OneTime, 10, false)]
    fn test_bills_in_month(#[case] frequency: FeeFrequency, #[case] month: u32, #[case] expected: bool) {
        assert_eq!(frequency.bills_in_month(month), expected);
    }

    #[test]
    fn test_out_of_range_month_never_bills() {
        assert!(!FeeFrequency::Monthly.bills_in_month(0));
        assert!(!FeeFrequency::Monthly.bills_in_month(13));
    }
}
