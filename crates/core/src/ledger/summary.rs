//! Outstanding balance summary for a student.

use rust_decimal::Decimal;
use serde::Serialize;

use super::transaction::FeeTransaction;

/// Totals over a student's PENDING and PARTIAL transactions.
///
/// Totals are plain decimals; they are never stored, so they may exceed the
/// range of a single money column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutstandingSummary {
    /// Sum of net amounts.
    pub total_due: Decimal,
    /// Sum of paid amounts.
    pub total_paid: Decimal,
    /// `total_due - total_paid`.
    pub outstanding: Decimal,
    /// Outstanding transactions, oldest due date first.
    pub transactions: Vec<FeeTransaction>,
}

impl OutstandingSummary {
    /// Builds the summary, ignoring transactions that are not outstanding.
    #[must_use]
    pub fn from_transactions(transactions: impl IntoIterator<Item = FeeTransaction>) -> Self {
        let mut transactions: Vec<_> = transactions
            .into_iter()
            .filter(|tx| tx.status.is_outstanding())
            .collect();
        transactions.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });

        let zero = Decimal::new(0, 2);
        let total_due: Decimal = transactions
            .iter()
            .fold(zero, |acc, tx| acc + tx.net_amount.amount());
        let total_paid: Decimal = transactions
            .iter()
            .fold(zero, |acc, tx| acc + tx.paid_amount.amount());

        Self {
            total_due,
            total_paid,
            outstanding: total_due - total_paid,
            transactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FeeFrequency, FeeStructure};
    use bursar_shared::{Money, StudentId};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn tx(code: &str, month: u32, net: Decimal, paid: Decimal) -> FeeTransaction {
        let structure = FeeStructure {
            code: code.into(),
            fee_type_code: "TUITION".into(),
            class_code: "G5".into(),
            frequency: FeeFrequency::Monthly,
            amount: Money::new(net).unwrap(),
            academic_year: "2023-2024".into(),
            is_active: true,
        };
        let mut tx = FeeTransaction::from_structure(
            code.into(),
            StudentId::new(),
            &structure,
            NaiveDate::from_ymd_opt(2024, month, 10).unwrap(),
            Utc::now(),
        );
        if !paid.is_zero() {
            tx.apply_allocation(Money::new(paid).unwrap(), Utc::now()).unwrap();
        }
        tx
    }

    #[test]
    fn test_summary_over_outstanding_rows() {
        let summary = OutstandingSummary::from_transactions(vec![
            tx("B", 2, dec!(300), dec!(100)),
            tx("A", 1, dec!(500), dec!(0)),
            tx("C", 3, dec!(200), dec!(200)),
        ]);

        assert_eq!(summary.total_due, dec!(800.00));
        assert_eq!(summary.total_paid, dec!(100.00));
        assert_eq!(summary.outstanding, dec!(700.00));
        let codes: Vec<_> = summary.transactions.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(codes, ["A", "B"]);
    }

    #[test]
    fn test_empty_summary_serializes_zeroes() {
        let summary = OutstandingSummary::from_transactions(Vec::new());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalDue"], "0.00");
        assert_eq!(json["outstanding"], "0.00");
        assert_eq!(json["transactions"].as_array().unwrap().len(), 0);
    }
}
