//! Fee transaction aggregate: one billed obligation for one student.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bursar_shared::{Money, StudentId};

use super::error::LedgerError;
use super::status::TransactionStatus;
use crate::catalog::FeeStructure;

/// A billed obligation.
///
/// Invariants upheld by every mutating method:
/// - `net_amount == custom_amount.unwrap_or(base_amount)`
/// - `paid_amount <= net_amount`
/// - `status` is derived from paid vs. net unless cancelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTransaction {
    /// Deterministic code, see [`crate::billing::transaction_code`].
    pub code: String,
    /// Billed student.
    pub student_id: StudentId,
    /// Structure the obligation was generated from.
    pub fee_structure_code: String,
    /// Due date, the 10th of the billing month.
    pub due_date: NaiveDate,
    /// Amount taken from the structure at generation time.
    pub base_amount: Money,
    /// Manual override of the base amount.
    pub custom_amount: Option<Money>,
    /// Amount actually owed.
    pub net_amount: Money,
    /// Amount allocated from payments so far.
    pub paid_amount: Money,
    /// Current status.
    pub status: TransactionStatus,
    /// Free-form remarks.
    pub remarks: Option<String>,
    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
    /// When the transaction was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FeeTransaction {
    /// Creates a fresh obligation billed from `structure`.
    #[must_use]
    pub fn from_structure(
        code: String,
        student_id: StudentId,
        structure: &FeeStructure,
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            student_id,
            fee_structure_code: structure.code.clone(),
            due_date,
            base_amount: structure.amount,
            custom_amount: None,
            net_amount: structure.amount,
            paid_amount: Money::ZERO,
            status: TransactionStatus::derive(Money::ZERO, structure.amount),
            remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount still owed.
    #[must_use]
    pub fn outstanding(&self) -> Money {
        self.net_amount.saturating_sub(self.paid_amount)
    }

    /// Records `amount` received against this obligation.
    ///
    /// # Errors
    ///
    /// Fails if the transaction no longer accepts payments or `amount`
    /// exceeds what is outstanding.
    pub fn apply_allocation(&mut self, amount: Money, now: DateTime<Utc>) -> Result<(), LedgerError> {
        match self.status {
            TransactionStatus::Paid => return Err(LedgerError::TransactionPaid),
            TransactionStatus::Cancelled => return Err(LedgerError::TransactionCancelled),
            TransactionStatus::Pending | TransactionStatus::Partial => {}
        }
        if amount > self.outstanding() {
            return Err(LedgerError::Internal(format!(
                "allocation of {amount} exceeds outstanding {} on {}",
                self.outstanding(),
                self.code
            )));
        }

        self.paid_amount = self
            .paid_amount
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Internal(format!("paid amount overflow on {}", self.code)))?;
        self.status = TransactionStatus::derive(self.paid_amount, self.net_amount);
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the amount owed with a manual override.
    ///
    /// # Errors
    ///
    /// Fails on paid or cancelled transactions, and when the override is
    /// below what has already been paid.
    pub fn override_amount(
        &mut self,
        custom_amount: Money,
        remarks: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        match self.status {
            TransactionStatus::Paid => return Err(LedgerError::TransactionPaid),
            TransactionStatus::Cancelled => return Err(LedgerError::TransactionCancelled),
            TransactionStatus::Pending | TransactionStatus::Partial => {}
        }
        if custom_amount < self.paid_amount {
            return Err(LedgerError::CustomAmountBelowPaid {
                custom: custom_amount.amount(),
                paid: self.paid_amount.amount(),
            });
        }

        self.custom_amount = Some(custom_amount);
        self.net_amount = custom_amount;
        self.remarks = remarks;
        self.status = TransactionStatus::derive(self.paid_amount, self.net_amount);
        self.updated_at = now;
        Ok(())
    }

    /// Cancels an obligation nothing has been paid against.
    ///
    /// # Errors
    ///
    /// Fails unless the transaction is PENDING.
    pub fn cancel(&mut self, remarks: Option<String>, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if self.status != TransactionStatus::Pending {
            return Err(LedgerError::CannotCancel(self.status));
        }

        self.status = TransactionStatus::Cancelled;
        if remarks.is_some() {
            self.remarks = remarks;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Returns true if the money invariants hold.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let net_matches = self.net_amount == self.custom_amount.unwrap_or(self.base_amount);
        let status_matches = self.status == TransactionStatus::Cancelled
            || self.status == TransactionStatus::derive(self.paid_amount, self.net_amount);
        net_matches && self.paid_amount <= self.net_amount && status_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FeeFrequency;
    use rust_decimal_macros::dec;

    fn money(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount).unwrap()
    }

    fn pending(net: rust_decimal::Decimal) -> FeeTransaction {
        let structure = FeeStructure {
            code: "TUITION-G5".into(),
            fee_type_code: "TUITION".into(),
            class_code: "G5".into(),
            frequency: FeeFrequency::Monthly,
            amount: money(net),
            academic_year: "2023-2024".into(),
            is_active: true,
        };
        FeeTransaction::from_structure(
            "TXN-1".into(),
            StudentId::new(),
            &structure,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_from_structure_starts_pending() {
        let tx = pending(dec!(500));
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.net_amount, tx.base_amount);
        assert_eq!(tx.paid_amount, Money::ZERO);
        assert!(tx.custom_amount.is_none());
        assert!(tx.is_consistent());
    }

    #[test]
    fn test_zero_amount_structure_is_born_paid() {
        let tx = pending(dec!(0));
        assert_eq!(tx.status, TransactionStatus::Paid);
        assert!(tx.is_consistent());
    }

    #[test]
    fn test_apply_allocation_partial_then_paid() {
        let mut tx = pending(dec!(500));
        tx.apply_allocation(money(dec!(100)), Utc::now()).unwrap();
        assert_eq!(tx.status, TransactionStatus::Partial);
        assert_eq!(tx.outstanding(), money(dec!(400)));

        tx.apply_allocation(money(dec!(400)), Utc::now()).unwrap();
        assert_eq!(tx.status, TransactionStatus::Paid);
        assert_eq!(tx.outstanding(), Money::ZERO);
        assert!(tx.is_consistent());
    }

    #[test]
    fn test_apply_allocation_rejects_excess() {
        let mut tx = pending(dec!(500));
        assert!(matches!(
            tx.apply_allocation(money(dec!(500.01)), Utc::now()),
            Err(LedgerError::Internal(_))
        ));
        assert_eq!(tx.paid_amount, Money::ZERO);
    }

    #[test]
    fn test_override_recomputes_net_and_status() {
        let mut tx = pending(dec!(500));
        tx.apply_allocation(money(dec!(200)), Utc::now()).unwrap();
        tx.override_amount(money(dec!(200)), Some("sibling discount".into()), Utc::now())
            .unwrap();

        assert_eq!(tx.custom_amount, Some(money(dec!(200))));
        assert_eq!(tx.net_amount, money(dec!(200)));
        assert_eq!(tx.status, TransactionStatus::Paid);
        assert_eq!(tx.remarks.as_deref(), Some("sibling discount"));
        assert!(tx.is_consistent());
    }

    #[test]
    fn test_override_rejected_when_paid() {
        let mut tx = pending(dec!(300));
        tx.apply_allocation(money(dec!(300)), Utc::now()).unwrap();
        let before = tx.clone();

        assert!(matches!(
            tx.override_amount(money(dec!(100)), None, Utc::now()),
            Err(LedgerError::TransactionPaid)
        ));
        assert_eq!(tx, before);
    }

    #[test]
    fn test_override_below_paid_rejected() {
        let mut tx = pending(dec!(500));
        tx.apply_allocation(money(dec!(300)), Utc::now()).unwrap();
        assert!(matches!(
            tx.override_amount(money(dec!(250)), None, Utc::now()),
            Err(LedgerError::CustomAmountBelowPaid { .. })
        ));
    }

    #[test]
    fn test_cancel_only_from_pending() {
        let mut tx = pending(dec!(500));
        tx.cancel(Some("left school".into()), Utc::now()).unwrap();
        assert_eq!(tx.status, TransactionStatus::Cancelled);
        assert!(tx.is_consistent());

        assert!(matches!(
            tx.apply_allocation(money(dec!(1)), Utc::now()),
            Err(LedgerError::TransactionCancelled)
        ));
        assert!(matches!(
            tx.cancel(None, Utc::now()),
            Err(LedgerError::CannotCancel(TransactionStatus::Cancelled))
        ));

        let mut partial = pending(dec!(500));
        partial.apply_allocation(money(dec!(1)), Utc::now()).unwrap();
        assert!(partial.cancel(None, Utc::now()).is_err());
    }
}
