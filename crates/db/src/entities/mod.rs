//! `SeaORM` entity definitions.
//!
//! Column names are camelCase in the database and mapped to snake_case
//! fields with `column_name`.

pub mod class_sections;
pub mod classes;
pub mod fee_structures;
pub mod fee_transactions;
pub mod fee_types;
pub mod payment_allocations;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod student_assignments;
pub mod students;
