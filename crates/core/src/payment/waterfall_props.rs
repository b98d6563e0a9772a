//! Property-based tests for the FIFO waterfall.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use bursar_shared::{Money, StudentId};

use crate::catalog::{FeeFrequency, FeeStructure};
use crate::ledger::FeeTransaction;
use crate::payment::waterfall::plan_allocation;

/// Strategy for amounts between 0.01 and 10,000.00.
fn arb_money() -> impl Strategy<Value = Money> {
    (1i64..=1_000_000).prop_map(|cents| Money::from_minor_units(cents).unwrap())
}

/// Strategy for an ordered list of outstanding transactions, some partly paid.
fn arb_outstanding() -> impl Strategy<Value = Vec<FeeTransaction>> {
    prop::collection::vec((1i64..=500_000, 0u32..100), 1..8).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (net_cents, paid_pct))| {
                let structure = FeeStructure {
                    code: format!("S{i}"),
                    fee_type_code: "TUITION".into(),
                    class_code: "G5".into(),
                    frequency: FeeFrequency::Monthly,
                    amount: Money::from_minor_units(net_cents).unwrap(),
                    academic_year: "2023-2024".into(),
                    is_active: true,
                };
                let mut tx = FeeTransaction::from_structure(
                    format!("TXN-{i}"),
                    StudentId::new(),
                    &structure,
                    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                    Utc::now(),
                );
                let paid_cents = net_cents * i64::from(paid_pct) / 100;
                if paid_cents > 0 {
                    tx.apply_allocation(Money::from_minor_units(paid_cents).unwrap(), Utc::now())
                        .unwrap();
                }
                tx
            })
            .collect()
    })
}

fn sum(values: impl Iterator<Item = Money>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, m| acc + m.amount())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Allocated lines plus the unallocated remainder always equal the payment.
    #[test]
    fn prop_amount_is_conserved(amount in arb_money(), txs in arb_outstanding()) {
        let plan = plan_allocation(amount, &txs);
        let allocated = sum(plan.lines.iter().map(|l| l.amount));
        prop_assert_eq!(allocated + plan.unallocated.amount(), amount.amount());
    }

    /// No line takes more than its transaction owes, and none is zero.
    #[test]
    fn prop_lines_within_outstanding(amount in arb_money(), txs in arb_outstanding()) {
        let plan = plan_allocation(amount, &txs);
        for line in &plan.lines {
            prop_assert!(line.amount.is_positive());
            prop_assert!(line.amount <= txs[line.index].outstanding());
        }
    }

    /// Every line except the last settles its transaction in full, and lines
    /// follow input order.
    #[test]
    fn prop_oldest_first(amount in arb_money(), txs in arb_outstanding()) {
        let plan = plan_allocation(amount, &txs);
        for pair in plan.lines.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
            prop_assert_eq!(pair[0].amount, txs[pair[0].index].outstanding());
        }
    }

    /// A remainder is only left once everything outstanding is covered.
    #[test]
    fn prop_surplus_only_after_full_settlement(amount in arb_money(), txs in arb_outstanding()) {
        let plan = plan_allocation(amount, &txs);
        let total_outstanding = sum(txs.iter().map(FeeTransaction::outstanding));
        if plan.unallocated.is_positive() {
            prop_assert_eq!(amount.amount() - plan.unallocated.amount(), total_outstanding);
        } else {
            prop_assert!(amount.amount() <= total_outstanding);
        }
    }
}
