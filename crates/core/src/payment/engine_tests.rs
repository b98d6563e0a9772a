//! Tests for the payment allocation engine against the in-memory store.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bursar_shared::{Money, OverpaymentPolicy, StudentId};

use super::engine::{PaymentAllocationEngine, validate_payment};
use super::types::{NewPayment, PaymentMode};
use crate::catalog::{FeeFrequency, FeeStructure};
use crate::ledger::{FeeTransaction, LedgerError, TransactionStatus};
use crate::store::{FeeTransactionStore, LedgerSession, MemoryLedger, UnitOfWork};

fn money(amount: Decimal) -> Money {
    Money::new(amount).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// Inserts a PENDING transaction directly, bypassing the generator.
async fn seed(ledger: &MemoryLedger, student: StudentId, code: &str, net: Decimal, due: (i32, u32)) {
    let structure = FeeStructure {
        code: format!("S-{code}"),
        fee_type_code: "TUITION".into(),
        class_code: "G5".into(),
        frequency: FeeFrequency::Monthly,
        amount: money(net),
        academic_year: "2023-2024".into(),
        is_active: true,
    };
    let tx = FeeTransaction::from_structure(
        code.into(),
        student,
        &structure,
        NaiveDate::from_ymd_opt(due.0, due.1, 10).unwrap(),
        Utc::now(),
    );
    let mut session = ledger.begin().await.unwrap();
    session.insert_transaction(&tx).await.unwrap();
    session.commit().await.unwrap();
}

async fn student_with_two_obligations() -> (MemoryLedger, StudentId) {
    let ledger = MemoryLedger::new();
    let student = StudentId::new();
    ledger.add_student(student, ["G5"]).await;
    // Inserted out of due-date order on purpose
    seed(&ledger, student, "FEB", dec!(300), (2024, 2)).await;
    seed(&ledger, student, "JAN", dec!(500), (2024, 1)).await;
    (ledger, student)
}

fn payment(student_id: StudentId, amount: Decimal) -> NewPayment {
    NewPayment {
        student_id,
        amount: money(amount),
        payment_date: today(),
        payment_mode: PaymentMode::Upi,
        reference_number: Some("UPI-0001".into()),
        remarks: None,
    }
}

fn engine(ledger: &MemoryLedger, policy: OverpaymentPolicy) -> PaymentAllocationEngine<MemoryLedger> {
    PaymentAllocationEngine::new(ledger.clone(), policy)
}

#[tokio::test]
async fn test_fifo_allocation() {
    let (ledger, student) = student_with_two_obligations().await;

    let receipt = engine(&ledger, OverpaymentPolicy::Reject)
        .allocate(payment(student, dec!(600)), today())
        .await
        .unwrap();

    let jan = ledger.transaction("JAN").await.unwrap();
    let feb = ledger.transaction("FEB").await.unwrap();
    assert_eq!(jan.status, TransactionStatus::Paid);
    assert_eq!(jan.paid_amount, money(dec!(500)));
    assert_eq!(feb.status, TransactionStatus::Partial);
    assert_eq!(feb.paid_amount, money(dec!(100)));

    let walked: Vec<_> = receipt
        .allocations
        .iter()
        .map(|a| (a.fee_transaction_code.as_str(), a.allocated_amount))
        .collect();
    assert_eq!(walked, [("JAN", money(dec!(500))), ("FEB", money(dec!(100)))]);
    assert_eq!(receipt.allocated_total(), dec!(600));
    assert_eq!(receipt.unallocated_amount, Decimal::ZERO);
    assert!(receipt.allocations.iter().all(|a| a.payment_id == receipt.payment.id));
}

#[tokio::test]
async fn test_exact_payment_stops_walking() {
    let (ledger, student) = student_with_two_obligations().await;

    let receipt = engine(&ledger, OverpaymentPolicy::Reject)
        .allocate(payment(student, dec!(500)), today())
        .await
        .unwrap();

    assert_eq!(receipt.allocations.len(), 1);
    assert_eq!(
        ledger.transaction("FEB").await.unwrap().status,
        TransactionStatus::Pending
    );
}

#[tokio::test]
async fn test_successive_payments_continue_where_left_off() {
    let (ledger, student) = student_with_two_obligations().await;
    let engine = engine(&ledger, OverpaymentPolicy::Reject);

    engine.allocate(payment(student, dec!(450)), today()).await.unwrap();
    let second = engine.allocate(payment(student, dec!(350)), today()).await.unwrap();

    let walked: Vec<_> = second
        .allocations
        .iter()
        .map(|a| (a.fee_transaction_code.as_str(), a.allocated_amount))
        .collect();
    assert_eq!(walked, [("JAN", money(dec!(50))), ("FEB", money(dec!(300)))]);
    for tx in ledger.transactions_for(student).await {
        assert_eq!(tx.status, TransactionStatus::Paid);
        assert!(tx.is_consistent());
    }
}

#[tokio::test]
async fn test_overpayment_rejected_by_default() {
    let (ledger, student) = student_with_two_obligations().await;

    let err = engine(&ledger, OverpaymentPolicy::Reject)
        .allocate(payment(student, dec!(900)), today())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Overpayment { amount, outstanding }
            if amount == dec!(900) && outstanding == dec!(800)
    ));
    assert!(ledger.payments().await.is_empty());
    assert!(ledger.allocations().await.is_empty());
    assert_eq!(
        ledger.transaction("JAN").await.unwrap().paid_amount,
        Money::ZERO
    );
}

#[tokio::test]
async fn test_overpayment_left_unapplied() {
    let (ledger, student) = student_with_two_obligations().await;

    let receipt = engine(&ledger, OverpaymentPolicy::LeaveUnapplied)
        .allocate(payment(student, dec!(900)), today())
        .await
        .unwrap();

    assert_eq!(receipt.payment.amount, money(dec!(900)));
    assert_eq!(receipt.unallocated_amount, dec!(100));
    assert_eq!(receipt.allocated_total(), dec!(800));
    assert_eq!(ledger.payments().await.len(), 1);
}

#[tokio::test]
async fn test_no_pending_transactions() {
    let ledger = MemoryLedger::new();
    let student = StudentId::new();
    ledger.add_student(student, ["G5"]).await;

    let err = engine(&ledger, OverpaymentPolicy::Reject)
        .allocate(payment(student, dec!(100)), today())
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::NoPendingTransactions));
    assert!(ledger.payments().await.is_empty());
}

#[tokio::test]
async fn test_unknown_student() {
    let (ledger, _) = student_with_two_obligations().await;
    let err = engine(&ledger, OverpaymentPolicy::Reject)
        .allocate(payment(StudentId::new(), dec!(100)), today())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::StudentNotFound(_)));
}

#[test]
fn test_validate_payment() {
    let student = StudentId::new();
    assert!(matches!(
        validate_payment(&payment(student, dec!(0)), today()),
        Err(LedgerError::NonPositiveAmount)
    ));

    let mut future = payment(student, dec!(10));
    future.payment_date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    assert!(matches!(
        validate_payment(&future, today()),
        Err(LedgerError::FutureDated { .. })
    ));

    assert!(validate_payment(&payment(student, dec!(10)), today()).is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_payments_never_double_allocate() {
    let ledger = MemoryLedger::new();
    let student = StudentId::new();
    ledger.add_student(student, ["G5"]).await;
    seed(&ledger, student, "JAN", dec!(500), (2024, 1)).await;

    let engine = engine(&ledger, OverpaymentPolicy::Reject);
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.allocate(payment(student, dec!(500)), today()).await })
        })
        .collect();

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(LedgerError::NoPendingTransactions))));

    let jan = ledger.transaction("JAN").await.unwrap();
    assert_eq!(jan.status, TransactionStatus::Paid);
    assert_eq!(jan.paid_amount, money(dec!(500)));
    assert_eq!(ledger.payments().await.len(), 1);
    assert_eq!(ledger.allocations().await.len(), 1);
}
