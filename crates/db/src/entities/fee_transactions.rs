//! `SeaORM` Entity for fee_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::FeeTransactionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    #[sea_orm(column_name = "studentId")]
    pub student_id: Uuid,
    #[sea_orm(column_name = "feeStructureCode")]
    pub fee_structure_code: String,
    #[sea_orm(column_name = "dueDate")]
    pub due_date: Date,
    #[sea_orm(column_name = "baseAmount", column_type = "Decimal(Some((10, 2)))")]
    pub base_amount: Decimal,
    #[sea_orm(column_name = "customAmount", column_type = "Decimal(Some((10, 2)))", nullable)]
    pub custom_amount: Option<Decimal>,
    #[sea_orm(column_name = "netAmount", column_type = "Decimal(Some((10, 2)))")]
    pub net_amount: Decimal,
    #[sea_orm(column_name = "paidAmount", column_type = "Decimal(Some((10, 2)))")]
    pub paid_amount: Decimal,
    pub status: FeeTransactionStatus,
    pub remarks: Option<String>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(column_name = "deletedAt")]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fee_structures::Entity",
        from = "Column::FeeStructureCode",
        to = "super::fee_structures::Column::Code"
    )]
    FeeStructures,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Students,
    #[sea_orm(has_many = "super::payment_allocations::Entity")]
    PaymentAllocations,
}

impl Related<super::fee_structures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeStructures.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::payment_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
