//! Fee structure repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use bursar_core::LedgerError;
use bursar_core::catalog::{FeeFrequency, FeeStructure};
use bursar_shared::Money;

use super::convert;
use super::db_error::{map_db_err, map_insert_err};
use crate::entities::{classes, fee_structures, fee_types};

/// Input for creating a fee structure.
#[derive(Debug, Clone)]
pub struct CreateFeeStructureInput {
    /// Unique code, e.g. `CLASS1-TUITION-2024`.
    pub code: String,
    /// Fee type charged.
    pub fee_type_code: String,
    /// Class billed.
    pub class_code: String,
    /// Billing frequency.
    pub frequency: FeeFrequency,
    /// Amount billed each time the structure fires.
    pub amount: Money,
    /// Academic year, e.g. `2024-2025`.
    pub academic_year: String,
    /// Only active structures are billed.
    pub is_active: bool,
}

/// Input for updating a fee structure. `None` leaves a field unchanged.
///
/// Amount changes apply to obligations generated afterwards; existing
/// transactions keep the base amount they were billed with.
#[derive(Debug, Clone, Default)]
pub struct UpdateFeeStructureInput {
    /// Fee type charged.
    pub fee_type_code: Option<String>,
    /// Class billed.
    pub class_code: Option<String>,
    /// Billing frequency.
    pub frequency: Option<FeeFrequency>,
    /// Amount billed.
    pub amount: Option<Money>,
    /// Academic year.
    pub academic_year: Option<String>,
    /// Whether the structure is billed.
    pub is_active: Option<bool>,
}

/// Filter options for listing fee structures.
#[derive(Debug, Clone, Default)]
pub struct FeeStructureFilter {
    /// Filter by class.
    pub class_code: Option<String>,
    /// Filter by academic year.
    pub academic_year: Option<String>,
    /// Filter by active flag.
    pub is_active: Option<bool>,
}

/// Fee structure repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct FeeStructureRepository {
    db: DatabaseConnection,
}

impl FeeStructureRepository {
    /// Creates a new fee structure repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fee structure.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code is already taken
    /// - The fee type or the class does not exist
    pub async fn create(&self, input: CreateFeeStructureInput) -> Result<FeeStructure, LedgerError> {
        let existing = fee_structures::Entity::find_by_id(input.code.clone())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        if existing.is_some() {
            return Err(LedgerError::DuplicateCode {
                entity: "Fee structure",
                code: input.code,
            });
        }

        self.ensure_fee_type(&input.fee_type_code).await?;
        self.ensure_class(&input.class_code).await?;

        let now = Utc::now().into();
        let code = input.code.clone();
        let structure = fee_structures::ActiveModel {
            code: Set(input.code),
            fee_type_code: Set(input.fee_type_code),
            class_code: Set(input.class_code),
            frequency: Set(input.frequency.into()),
            amount: Set(input.amount.amount()),
            academic_year: Set(input.academic_year),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = structure
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_err(e, "Fee structure", &code))?;

        tracing::info!(
            code = %model.code,
            class_code = %model.class_code,
            academic_year = %model.academic_year,
            "fee structure created"
        );
        convert::fee_structure(model)
    }

    /// Lists fee structures ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: FeeStructureFilter) -> Result<Vec<FeeStructure>, LedgerError> {
        let mut query = fee_structures::Entity::find()
            .filter(fee_structures::Column::DeletedAt.is_null())
            .order_by_asc(fee_structures::Column::Code);

        if let Some(class_code) = filter.class_code {
            query = query.filter(fee_structures::Column::ClassCode.eq(class_code));
        }

        if let Some(academic_year) = filter.academic_year {
            query = query.filter(fee_structures::Column::AcademicYear.eq(academic_year));
        }

        if let Some(is_active) = filter.is_active {
            query = query.filter(fee_structures::Column::IsActive.eq(is_active));
        }

        let rows = query.all(&self.db).await.map_err(map_db_err)?;
        rows.into_iter().map(convert::fee_structure).collect()
    }

    /// Finds a fee structure by code.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::FeeStructureNotFound`] if it does not exist.
    pub async fn get(&self, code: &str) -> Result<FeeStructure, LedgerError> {
        let model = self.find_model(code).await?;
        convert::fee_structure(model)
    }

    /// Updates a fee structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure, or a newly referenced fee type or
    /// class, does not exist.
    pub async fn update(
        &self,
        code: &str,
        input: UpdateFeeStructureInput,
    ) -> Result<FeeStructure, LedgerError> {
        let model = self.find_model(code).await?;

        if let Some(fee_type_code) = &input.fee_type_code
            && *fee_type_code != model.fee_type_code
        {
            self.ensure_fee_type(fee_type_code).await?;
        }

        if let Some(class_code) = &input.class_code
            && *class_code != model.class_code
        {
            self.ensure_class(class_code).await?;
        }

        let mut active: fee_structures::ActiveModel = model.into();

        if let Some(fee_type_code) = input.fee_type_code {
            active.fee_type_code = Set(fee_type_code);
        }
        if let Some(class_code) = input.class_code {
            active.class_code = Set(class_code);
        }
        if let Some(frequency) = input.frequency {
            active.frequency = Set(frequency.into());
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount.amount());
        }
        if let Some(academic_year) = input.academic_year {
            active.academic_year = Set(academic_year);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(map_db_err)?;
        convert::fee_structure(updated)
    }

    /// Soft-deletes a fee structure.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::FeeStructureNotFound`] if it does not exist.
    pub async fn delete(&self, code: &str) -> Result<(), LedgerError> {
        let model = self.find_model(code).await?;
        let now = Utc::now().into();

        let mut active: fee_structures::ActiveModel = model.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await.map_err(map_db_err)?;

        tracing::info!(code, "fee structure deleted");
        Ok(())
    }

    async fn find_model(&self, code: &str) -> Result<fee_structures::Model, LedgerError> {
        fee_structures::Entity::find_by_id(code.to_string())
            .filter(fee_structures::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| LedgerError::FeeStructureNotFound(code.to_string()))
    }

    async fn ensure_fee_type(&self, code: &str) -> Result<(), LedgerError> {
        let fee_type = fee_types::Entity::find_by_id(code.to_string())
            .filter(fee_types::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match fee_type {
            Some(_) => Ok(()),
            None => Err(LedgerError::FeeTypeNotFound(code.to_string())),
        }
    }

    async fn ensure_class(&self, code: &str) -> Result<(), LedgerError> {
        let class = classes::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match class {
            Some(_) => Ok(()),
            None => Err(LedgerError::ClassNotFound(code.to_string())),
        }
    }
}
