//! `SeaORM` Entity for fee_structures table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::FeeFrequency;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    #[sea_orm(column_name = "feeTypeCode")]
    pub fee_type_code: String,
    #[sea_orm(column_name = "classCode")]
    pub class_code: String,
    pub frequency: FeeFrequency,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_name = "academicYear")]
    pub academic_year: String,
    #[sea_orm(column_name = "isActive")]
    pub is_active: bool,
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
        belongs_to = "super::fee_types::Entity",
        from = "Column::FeeTypeCode",
        to = "super::fee_types::Column::Code"
    )]
    FeeTypes,
    #[sea_orm(has_many = "super::fee_transactions::Entity")]
    FeeTransactions,
}

impl Related<super::fee_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeTypes.def()
    }
}

impl Related<super::fee_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
