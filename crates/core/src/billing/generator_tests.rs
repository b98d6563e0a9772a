//! Tests for the transaction generator against the in-memory store.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bursar_shared::{Money, StudentId};

use super::generator::{GenerateRequest, TransactionGenerator};
use super::period::BillingMonth;
use crate::catalog::{FeeFrequency, FeeStructure};
use crate::ledger::{LedgerError, TransactionStatus};
use crate::store::MemoryLedger;

fn structure(code: &str, class_code: &str, frequency: FeeFrequency, amount: Decimal) -> FeeStructure {
    FeeStructure {
        code: code.into(),
        fee_type_code: "TUITION".into(),
        class_code: class_code.into(),
        frequency,
        amount: Money::new(amount).unwrap(),
        academic_year: "2023-2024".into(),
        is_active: true,
    }
}

async fn school() -> (MemoryLedger, StudentId) {
    let ledger = MemoryLedger::new();
    let student = StudentId::new();
    ledger.add_student(student, ["G5"]).await;
    ledger
        .add_structure(structure("TUITION-G5", "G5", FeeFrequency::Monthly, dec!(4500)))
        .await;
    ledger
        .add_structure(structure("EXAM-G5", "G5", FeeFrequency::Quarterly, dec!(1200)))
        .await;
    ledger
        .add_structure(structure("LAB-G5", "G5", FeeFrequency::HalfYearly, dec!(800)))
        .await;
    ledger
        .add_structure(structure("ADMISSION-G5", "G5", FeeFrequency::OneTime, dec!(10000)))
        .await;
    (ledger, student)
}

fn request(student_id: StudentId, month: &str) -> GenerateRequest {
    GenerateRequest {
        student_id,
        month: month.parse().unwrap(),
        academic_year: "2023-2024".into(),
    }
}

#[tokio::test]
async fn test_generates_structures_due_this_month() {
    let (ledger, student) = school().await;
    let created = TransactionGenerator::new(ledger.clone())
        .generate(&request(student, "2024-01"))
        .await
        .unwrap();

    let mut codes: Vec<_> = created.iter().map(|t| t.fee_structure_code.as_str()).collect();
    codes.sort_unstable();
    assert_eq!(codes, ["EXAM-G5", "TUITION-G5"]);

    for tx in &created {
        assert_eq!(tx.due_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.paid_amount, Money::ZERO);
        assert_eq!(tx.net_amount, tx.base_amount);
        assert!(tx.code.starts_with(&format!("TXN-{student}-202401-")));
    }
    assert_eq!(ledger.transactions_for(student).await.len(), 2);
}

#[tokio::test]
async fn test_april_bills_every_frequency() {
    let (ledger, student) = school().await;
    let created = TransactionGenerator::new(ledger)
        .generate(&request(student, "2024-04"))
        .await
        .unwrap();
    assert_eq!(created.len(), 4);
}

#[tokio::test]
async fn test_generation_is_idempotent() {
    let (ledger, student) = school().await;
    let generator = TransactionGenerator::new(ledger.clone());

    let first = generator.generate(&request(student, "2024-01")).await.unwrap();
    let after_first = ledger.transactions_for(student).await;

    let second = generator.generate(&request(student, "2024-01")).await.unwrap();
    assert_eq!(first.len(), 2);
    assert!(second.is_empty());
    assert_eq!(ledger.transactions_for(student).await, after_first);
}

#[tokio::test]
async fn test_unknown_student() {
    let (ledger, _) = school().await;
    let stranger = StudentId::new();
    let err = TransactionGenerator::new(ledger)
        .generate(&request(stranger, "2024-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::StudentNotFound(id) if id == stranger));
}

#[tokio::test]
async fn test_student_without_enrollment() {
    let ledger = MemoryLedger::new();
    let student = StudentId::new();
    ledger.add_student(student, Vec::<String>::new()).await;

    let err = TransactionGenerator::new(ledger)
        .generate(&request(student, "2024-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NoActiveEnrollment(_)));
}

#[tokio::test]
async fn test_no_structures_for_academic_year() {
    let (ledger, student) = school().await;
    let mut req = request(student, "2024-01");
    req.academic_year = "2030-2031".into();

    let err = TransactionGenerator::new(ledger.clone())
        .generate(&req)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NoFeeStructures(year) if year == "2030-2031"));
    assert!(ledger.transactions_for(student).await.is_empty());
}

#[tokio::test]
async fn test_inactive_structures_and_other_classes_ignored() {
    let (ledger, student) = school().await;
    let mut inactive = structure("SPORTS-G5", "G5", FeeFrequency::Monthly, dec!(300));
    inactive.is_active = false;
    ledger.add_structure(inactive).await;
    ledger
        .add_structure(structure("TUITION-G6", "G6", FeeFrequency::Monthly, dec!(5000)))
        .await;

    let created = TransactionGenerator::new(ledger)
        .generate(&request(student, "2024-02"))
        .await
        .unwrap();
    let codes: Vec<_> = created.iter().map(|t| t.fee_structure_code.as_str()).collect();
    assert_eq!(codes, ["TUITION-G5"]);
}

#[tokio::test]
async fn test_multiple_enrollments_bill_each_class_once() {
    let ledger = MemoryLedger::new();
    let student = StudentId::new();
    // Two sections of G5 plus an extra-curricular class
    ledger.add_student(student, ["G5", "G5", "CHESS"]).await;
    ledger
        .add_structure(structure("TUITION-G5", "G5", FeeFrequency::Monthly, dec!(4500)))
        .await;
    ledger
        .add_structure(structure("CHESS-CLUB", "CHESS", FeeFrequency::Monthly, dec!(250)))
        .await;

    let created = TransactionGenerator::new(ledger)
        .generate(&request(student, "2024-03"))
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
}

#[tokio::test]
async fn test_zero_amount_structure_generates_paid_row() {
    let ledger = MemoryLedger::new();
    let student = StudentId::new();
    ledger.add_student(student, ["G5"]).await;
    ledger
        .add_structure(structure("WAIVED-G5", "G5", FeeFrequency::Monthly, dec!(0)))
        .await;

    let created = TransactionGenerator::new(ledger)
        .generate(&request(student, "2024-03"))
        .await
        .unwrap();
    assert_eq!(created[0].status, TransactionStatus::Paid);
}

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
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// A structure produces a transaction exactly when its frequency bills
    /// in the requested month, and a second run never adds anything.
    #[test]
    fn prop_generation_follows_frequency(frequency in arb_frequency(), month in 1u32..=12) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let ledger = MemoryLedger::new();
            let student = StudentId::new();
            ledger.add_student(student, ["G5"]).await;
            ledger.add_structure(structure("FEE-G5", "G5", frequency, dec!(100))).await;

            let generator = TransactionGenerator::new(ledger.clone());
            let req = GenerateRequest {
                student_id: student,
                month: BillingMonth::new(2024, month).unwrap(),
                academic_year: "2023-2024".into(),
            };

            let first = generator.generate(&req).await.unwrap();
            let second = generator.generate(&req).await.unwrap();
            assert_eq!(first.len(), usize::from(frequency.bills_in_month(month)));
            assert!(second.is_empty());
        });
    }
}
