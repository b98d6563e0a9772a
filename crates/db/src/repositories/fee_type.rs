//! Fee type repository.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use bursar_core::LedgerError;
use bursar_core::catalog::{FeeApplicability, FeeType};

use super::convert;
use super::db_error::{map_db_err, map_insert_err};
use crate::entities::fee_types;

/// Input for creating a fee type.
#[derive(Debug, Clone)]
pub struct CreateFeeTypeInput {
    /// Unique code, e.g. `TUITION`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Activity the fee applies to.
    pub applicable_to: FeeApplicability,
    /// Whether the type is offered.
    pub is_active: bool,
}

/// Input for updating a fee type. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateFeeTypeInput {
    /// Display name.
    pub name: Option<String>,
    /// Description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Activity the fee applies to.
    pub applicable_to: Option<FeeApplicability>,
    /// Whether the type is offered.
    pub is_active: Option<bool>,
}

/// Fee type repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct FeeTypeRepository {
    db: DatabaseConnection,
}

impl FeeTypeRepository {
    /// Creates a new fee type repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fee type.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateCode`] if the code is taken, including
    /// by a deleted fee type.
    pub async fn create(&self, input: CreateFeeTypeInput) -> Result<FeeType, LedgerError> {
        let existing = fee_types::Entity::find_by_id(input.code.clone())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        if existing.is_some() {
            return Err(LedgerError::DuplicateCode {
                entity: "Fee type",
                code: input.code,
            });
        }

        let now = Utc::now().into();
        let code = input.code.clone();
        let fee_type = fee_types::ActiveModel {
            code: Set(input.code),
            name: Set(input.name),
            description: Set(input.description),
            applicable_to: Set(input.applicable_to.into()),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = fee_type
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_err(e, "Fee type", &code))?;

        tracing::info!(code = %model.code, "fee type created");
        Ok(convert::fee_type(model))
    }

    /// Lists fee types ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<FeeType>, LedgerError> {
        let rows = fee_types::Entity::find()
            .filter(fee_types::Column::DeletedAt.is_null())
            .order_by_asc(fee_types::Column::Code)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(convert::fee_type).collect())
    }

    /// Finds a fee type by code.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::FeeTypeNotFound`] if it does not exist.
    pub async fn get(&self, code: &str) -> Result<FeeType, LedgerError> {
        self.find_model(code).await.map(convert::fee_type)
    }

    /// Updates a fee type.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::FeeTypeNotFound`] if it does not exist.
    pub async fn update(&self, code: &str, input: UpdateFeeTypeInput) -> Result<FeeType, LedgerError> {
        let model = self.find_model(code).await?;
        let mut active: fee_types::ActiveModel = model.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(applicable_to) = input.applicable_to {
            active.applicable_to = Set(applicable_to.into());
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(convert::fee_type(updated))
    }

    /// Soft-deletes a fee type.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::FeeTypeNotFound`] if it does not exist.
    pub async fn delete(&self, code: &str) -> Result<(), LedgerError> {
        let model = self.find_model(code).await?;
        let now = Utc::now().into();

        let mut active: fee_types::ActiveModel = model.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await.map_err(map_db_err)?;

        tracing::info!(code, "fee type deleted");
        Ok(())
    }

    async fn find_model(&self, code: &str) -> Result<fee_types::Model, LedgerError> {
        fee_types::Entity::find_by_id(code.to_string())
            .filter(fee_types::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| LedgerError::FeeTypeNotFound(code.to_string()))
    }
}
