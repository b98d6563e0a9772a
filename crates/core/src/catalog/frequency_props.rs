//! Property-based tests for the frequency filter.

use proptest::prelude::*;

use crate::catalog::types::FeeFrequency;

fn arb_frequency() -> impl Strategy<Value = FeeFrequency> {
    prop_oneof![
        Just(FeeFrequency::Monthly),
        Just(FeeFrequency::Quarterly),
        Just(FeeFrequency::HalfYearly),
        Just(FeeFrequency::Annual),
        Just(FeeFrequency::OneTime),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Monthly structures bill in every calendar month.
    #[test]
    fn prop_monthly_bills_every_month(month in 1u32..=12) {
        prop_assert!(FeeFrequency::Monthly.bills_in_month(month));
    }

    /// Quarterly structures bill exactly at the start of each quarter.
    #[test]
    fn prop_quarterly_bills_on_quarter_starts(month in 1u32..=12) {
        prop_assert_eq!(
            FeeFrequency::Quarterly.bills_in_month(month),
            month % 3 == 1
        );
    }

    /// Billing months are a subset of the monthly calendar, so no frequency
    /// bills more often than monthly.
    #[test]
    fn prop_every_frequency_is_at_most_monthly(frequency in arb_frequency(), month in 1u32..=12) {
        if frequency.bills_in_month(month) {
            prop_assert!(FeeFrequency::Monthly.bills_in_month(month));
        }
    }

    /// Over a calendar year each frequency fires the expected number of times.
    #[test]
    fn prop_yearly_count_matches_frequency(frequency in arb_frequency()) {
        let fired = (1u32..=12).filter(|m| frequency.bills_in_month(*m)).count();
        let expected = match frequency {
            FeeFrequency::Monthly => 12,
            FeeFrequency::Quarterly => 4,
            FeeFrequency::HalfYearly => 2,
            FeeFrequency::Annual | FeeFrequency::OneTime => 1,
        };
        prop_assert_eq!(fired, expected);
    }
}
