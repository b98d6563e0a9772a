//! Row to domain conversions.

use chrono::Utc;
use rust_decimal::Decimal;

use bursar_core::LedgerError;
use bursar_core::catalog::{FeeStructure, FeeType};
use bursar_core::ledger::FeeTransaction;
use bursar_core::payment::{Payment, PaymentAllocation};
use bursar_shared::{Money, StudentId};

use crate::entities::{fee_structures, fee_transactions, fee_types, payment_allocations, payments};

/// Reads a stored amount back into [`Money`].
///
/// Columns are `decimal(10,2)` with non-negative checks, so a failure here
/// means the row was written outside this service.
fn money(value: Decimal, column: &str, key: &str) -> Result<Money, LedgerError> {
    Money::new(value).map_err(|e| LedgerError::Internal(format!("{column} of {key}: {e}")))
}

pub(crate) fn fee_type(model: fee_types::Model) -> FeeType {
    FeeType {
        code: model.code,
        name: model.name,
        description: model.description,
        applicable_to: model.applicable_to.into(),
        is_active: model.is_active,
    }
}

pub(crate) fn fee_structure(model: fee_structures::Model) -> Result<FeeStructure, LedgerError> {
    Ok(FeeStructure {
        amount: money(model.amount, "amount", &model.code)?,
        frequency: model.frequency.into(),
        code: model.code,
        fee_type_code: model.fee_type_code,
        class_code: model.class_code,
        academic_year: model.academic_year,
        is_active: model.is_active,
    })
}

pub(crate) fn fee_transaction(model: fee_transactions::Model) -> Result<FeeTransaction, LedgerError> {
    let custom_amount = model
        .custom_amount
        .map(|amount| money(amount, "customAmount", &model.code))
        .transpose()?;

    Ok(FeeTransaction {
        base_amount: money(model.base_amount, "baseAmount", &model.code)?,
        net_amount: money(model.net_amount, "netAmount", &model.code)?,
        paid_amount: money(model.paid_amount, "paidAmount", &model.code)?,
        custom_amount,
        student_id: StudentId::from_uuid(model.student_id),
        fee_structure_code: model.fee_structure_code,
        due_date: model.due_date,
        status: model.status.into(),
        remarks: model.remarks,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        code: model.code,
    })
}

pub(crate) fn payment(model: payments::Model) -> Result<Payment, LedgerError> {
    let key = format!("payment {}", model.id);
    Ok(Payment {
        id: model.id,
        student_id: StudentId::from_uuid(model.student_id),
        amount: money(model.amount, "amount", &key)?,
        payment_date: model.payment_date,
        payment_mode: model.payment_mode.into(),
        reference_number: model.reference_number,
        remarks: model.remarks,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

pub(crate) fn allocation(model: payment_allocations::Model) -> Result<PaymentAllocation, LedgerError> {
    let key = format!("allocation {}", model.id);
    Ok(PaymentAllocation {
        id: model.id,
        payment_id: model.payment_id,
        allocated_amount: money(model.allocated_amount, "allocatedAmount", &key)?,
        fee_transaction_code: model.fee_transaction_code,
        allocation_date: model.allocation_date.with_timezone(&Utc),
    })
}
