//! Property-based tests for status derivation and the money invariants.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;

use bursar_shared::{Money, StudentId};

use crate::catalog::{FeeFrequency, FeeStructure};
use crate::ledger::{FeeTransaction, TransactionStatus};

fn money(cents: i64) -> Money {
    Money::from_minor_units(cents).unwrap()
}

fn transaction(net_cents: i64) -> FeeTransaction {
    let structure = FeeStructure {
        code: "FS-G5-TUITION".into(),
        fee_type_code: "TUITION".into(),
        class_code: "G5".into(),
        frequency: FeeFrequency::Monthly,
        amount: money(net_cents),
        academic_year: "2023-2024".into(),
        is_active: true,
    };
    FeeTransaction::from_structure(
        "TXN-PROP".into(),
        StudentId::new(),
        &structure,
        NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
        Utc::now(),
    )
}

/// One step applied to a transaction.
#[derive(Debug, Clone)]
enum Step {
    Allocate(i64),
    Override(i64),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1i64..=200_000).prop_map(Step::Allocate),
        (0i64..=600_000).prop_map(Step::Override),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Status is a pure function of paid versus net.
    #[test]
    fn prop_derive_matches_amounts(paid in 0i64..=1_000_000, net in 0i64..=1_000_000) {
        let status = TransactionStatus::derive(money(paid), money(net));
        let expected = if paid >= net {
            TransactionStatus::Paid
        } else if paid == 0 {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Partial
        };
        prop_assert_eq!(status, expected);
        prop_assert!(status != TransactionStatus::Cancelled);
    }

    /// No mix of allocations and overrides can break net, paid or status.
    #[test]
    fn prop_mutations_keep_invariants(
        net in 1i64..=500_000,
        steps in prop::collection::vec(arb_step(), 0..12),
    ) {
        let mut tx = transaction(net);

        for step in steps {
            let before = tx.clone();
            let result = match step {
                Step::Allocate(cents) => tx.apply_allocation(money(cents), Utc::now()),
                Step::Override(cents) => tx.override_amount(money(cents), None, Utc::now()),
            };
            if result.is_err() {
                // Rejected mutations leave the row untouched
                prop_assert_eq!(&tx, &before);
            }
            prop_assert!(tx.is_consistent());
            prop_assert!(tx.paid_amount >= before.paid_amount);
        }
    }

    /// Once PAID, every further mutation is refused.
    #[test]
    fn prop_paid_is_terminal(net in 1i64..=500_000, extra in 0i64..=500_000) {
        let mut tx = transaction(net);
        tx.apply_allocation(money(net), Utc::now()).unwrap();
        prop_assert_eq!(tx.status, TransactionStatus::Paid);

        prop_assert!(tx.apply_allocation(money(extra.max(1)), Utc::now()).is_err());
        prop_assert!(tx.override_amount(money(extra), None, Utc::now()).is_err());
        prop_assert!(tx.cancel(None, Utc::now()).is_err());
        prop_assert_eq!(tx.paid_amount, money(net));
    }
}
