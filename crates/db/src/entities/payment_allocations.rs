//! `SeaORM` Entity for payment_allocations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_allocations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "paymentId")]
    pub payment_id: i32,
    #[sea_orm(column_name = "feeTransactionCode")]
    pub fee_transaction_code: String,
    #[sea_orm(column_name = "allocatedAmount", column_type = "Decimal(Some((10, 2)))")]
    pub allocated_amount: Decimal,
    #[sea_orm(column_name = "allocationDate")]
    pub allocation_date: DateTimeWithTimeZone,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payments::Entity",
        from = "Column::PaymentId",
        to = "super::payments::Column::Id"
    )]
    Payments,
    #[sea_orm(
        belongs_to = "super::fee_transactions::Entity",
        from = "Column::FeeTransactionCode",
        to = "super::fee_transactions::Column::Code"
    )]
    FeeTransactions,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::fee_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
