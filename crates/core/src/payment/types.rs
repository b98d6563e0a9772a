//! Payment domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use bursar_shared::{Money, StudentId};

/// How money was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    /// Cash at the counter.
    Cash,
    /// Cheque.
    Cheque,
    /// UPI transfer.
    Upi,
    /// Debit or credit card.
    Card,
    /// Net banking transfer.
    NetBanking,
    /// Demand draft.
    DemandDraft,
}

impl PaymentMode {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Cheque => "CHEQUE",
            Self::Upi => "UPI",
            Self::Card => "CARD",
            Self::NetBanking => "NET_BANKING",
            Self::DemandDraft => "DEMAND_DRAFT",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment as received, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    /// Paying student.
    pub student_id: StudentId,
    /// Amount received.
    pub amount: Money,
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// How it was received.
    pub payment_mode: PaymentMode,
    /// Cheque number, UPI reference and the like.
    pub reference_number: Option<String>,
    /// Free-form remarks.
    pub remarks: Option<String>,
}

/// A stored payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Sequential id.
    pub id: i32,
    /// Paying student.
    pub student_id: StudentId,
    /// Amount received.
    pub amount: Money,
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// How it was received.
    pub payment_mode: PaymentMode,
    /// External reference.
    pub reference_number: Option<String>,
    /// Free-form remarks.
    pub remarks: Option<String>,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
}

/// An allocation about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAllocation {
    /// Payment the money comes from.
    pub payment_id: i32,
    /// Transaction the money goes to.
    pub fee_transaction_code: String,
    /// Amount applied.
    pub allocated_amount: Money,
    /// When it was applied.
    pub allocation_date: DateTime<Utc>,
}

/// The portion of one payment applied to one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAllocation {
    /// Sequential id.
    pub id: i32,
    /// Payment the money comes from.
    pub payment_id: i32,
    /// Transaction the money goes to.
    pub fee_transaction_code: String,
    /// Amount applied.
    pub allocated_amount: Money,
    /// When it was applied.
    pub allocation_date: DateTime<Utc>,
}

/// A payment together with where its money went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithAllocations {
    /// The payment.
    #[serde(flatten)]
    pub payment: Payment,
    /// Allocations in walk order.
    pub allocations: Vec<PaymentAllocation>,
    /// Part of the payment not applied to any transaction.
    pub unallocated_amount: Decimal,
}

impl PaymentWithAllocations {
    /// Bundles a payment with its allocations.
    #[must_use]
    pub fn new(payment: Payment, allocations: Vec<PaymentAllocation>) -> Self {
        let allocated = allocations
            .iter()
            .fold(Decimal::new(0, 2), |acc, a| acc + a.allocated_amount.amount());
        let unallocated_amount = payment.amount.amount() - allocated;
        Self {
            payment,
            allocations,
            unallocated_amount,
        }
    }

    /// Sum of all allocated amounts.
    #[must_use]
    pub fn allocated_total(&self) -> Decimal {
        self.payment.amount.amount() - self.unallocated_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payment(amount: Decimal) -> Payment {
        Payment {
            id: 1,
            student_id: StudentId::new(),
            amount: Money::new(amount).unwrap(),
            payment_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            payment_mode: PaymentMode::Upi,
            reference_number: Some("UPI-1".into()),
            remarks: None,
            created_at: Utc::now(),
        }
    }

    fn allocation(code: &str, amount: Decimal) -> PaymentAllocation {
        PaymentAllocation {
            id: 1,
            payment_id: 1,
            fee_transaction_code: code.into(),
            allocated_amount: Money::new(amount).unwrap(),
            allocation_date: Utc::now(),
        }
    }

    #[test]
    fn test_unallocated_amount() {
        let bundle = PaymentWithAllocations::new(
            payment(dec!(600)),
            vec![allocation("A", dec!(500)), allocation("B", dec!(50))],
        );
        assert_eq!(bundle.unallocated_amount, dec!(50.00));
        assert_eq!(bundle.allocated_total(), dec!(550.00));
    }

    #[test]
    fn test_serializes_flat_camel_case() {
        let bundle = PaymentWithAllocations::new(payment(dec!(500)), vec![allocation("A", dec!(500))]);
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["paymentMode"], "UPI");
        assert_eq!(json["amount"], "500.00");
        assert_eq!(json["unallocatedAmount"], "0.00");
        assert_eq!(json["allocations"][0]["feeTransactionCode"], "A");
    }
}
