//! Processing lot management service

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::validation::{validate_lot_code, validate_stock_level};

use crate::error::{AppError, AppResult};
use crate::models::{ProcessingLot, ProcessingStage};

/// Processing lot service
#[derive(Clone)]
pub struct ProcessingService {
    db: PgPool,
}

/// Input for creating a processing lot
#[derive(Debug, Deserialize)]
pub struct CreateProcessingLotInput {
    pub lot_code: String,
    pub harvest_id: Uuid,
    pub stage: ProcessingStage,
    pub start_quantity: Decimal,
    pub final_quantity: Decimal,
    pub started_on: NaiveDate,
    pub finished_on: NaiveDate,
}

/// Input for updating a processing lot
#[derive(Debug, Deserialize)]
pub struct UpdateProcessingLotInput {
    pub lot_code: Option<String>,
    pub harvest_id: Option<Uuid>,
    pub stage: Option<ProcessingStage>,
    pub start_quantity: Option<Decimal>,
    pub final_quantity: Option<Decimal>,
    pub started_on: Option<NaiveDate>,
    pub finished_on: Option<NaiveDate>,
}

impl ProcessingService {
    /// Create a new ProcessingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn ensure_harvest(&self, harvest_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM harvests WHERE id = $1)")
                .bind(harvest_id)
                .fetch_one(&self.db)
                .await?;
        if !exists {
            return Err(AppError::NotFound("Harvest".to_string()));
        }
        Ok(())
    }

    fn validate_quantities(start: Decimal, fin: Decimal) -> AppResult<()> {
        validate_stock_level(start).map_err(|msg| AppError::Validation {
            field: "start_quantity".to_string(),
            message: msg.to_string(),
        })?;
        validate_stock_level(fin).map_err(|msg| AppError::Validation {
            field: "final_quantity".to_string(),
            message: msg.to_string(),
        })?;
        if fin > start {
            return Err(AppError::Validation {
                field: "final_quantity".to_string(),
                message: "Final quantity cannot exceed start quantity".to_string(),
            });
        }
        Ok(())
    }

    /// List processing lots, optionally filtered by stage
    pub async fn list_lots(&self, stage: Option<ProcessingStage>) -> AppResult<Vec<ProcessingLot>> {
        let lots = sqlx::query_as::<_, ProcessingLot>(
            r#"
            SELECT id, lot_code, harvest_id, stage, start_quantity, final_quantity,
                   started_on, finished_on, created_at
            FROM processing_lots
            WHERE ($1::processing_stage IS NULL OR stage = $1)
            ORDER BY started_on DESC, created_at DESC
            "#,
        )
        .bind(stage)
        .fetch_all(&self.db)
        .await?;

        Ok(lots)
    }

    /// Get a processing lot by id
    pub async fn get_lot(&self, lot_id: Uuid) -> AppResult<ProcessingLot> {
        sqlx::query_as::<_, ProcessingLot>(
            r#"
            SELECT id, lot_code, harvest_id, stage, start_quantity, final_quantity,
                   started_on, finished_on, created_at
            FROM processing_lots
            WHERE id = $1
            "#,
        )
        .bind(lot_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Processing lot".to_string()))
    }

    /// Create a processing lot
    pub async fn create_lot(&self, input: CreateProcessingLotInput) -> AppResult<ProcessingLot> {
        validate_lot_code(&input.lot_code).map_err(|msg| AppError::Validation {
            field: "lot_code".to_string(),
            message: msg.to_string(),
        })?;
        Self::validate_quantities(input.start_quantity, input.final_quantity)?;
        self.ensure_harvest(input.harvest_id).await?;

        let lot = sqlx::query_as::<_, ProcessingLot>(
            r#"
            INSERT INTO processing_lots
                (lot_code, harvest_id, stage, start_quantity, final_quantity, started_on, finished_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, lot_code, harvest_id, stage, start_quantity, final_quantity,
                      started_on, finished_on, created_at
            "#,
        )
        .bind(&input.lot_code)
        .bind(input.harvest_id)
        .bind(input.stage)
        .bind(input.start_quantity)
        .bind(input.final_quantity)
        .bind(input.started_on)
        .bind(input.finished_on)
        .fetch_one(&self.db)
        .await?;

        Ok(lot)
    }

    /// Update a processing lot
    pub async fn update_lot(
        &self,
        lot_id: Uuid,
        input: UpdateProcessingLotInput,
    ) -> AppResult<ProcessingLot> {
        let existing = self.get_lot(lot_id).await?;

        let lot_code = input.lot_code.unwrap_or(existing.lot_code);
        validate_lot_code(&lot_code).map_err(|msg| AppError::Validation {
            field: "lot_code".to_string(),
            message: msg.to_string(),
        })?;
        let harvest_id = input.harvest_id.unwrap_or(existing.harvest_id);
        let stage = input.stage.unwrap_or(existing.stage);
        let start_quantity = input.start_quantity.unwrap_or(existing.start_quantity);
        let final_quantity = input.final_quantity.unwrap_or(existing.final_quantity);
        let started_on = input.started_on.unwrap_or(existing.started_on);
        let finished_on = input.finished_on.unwrap_or(existing.finished_on);

        Self::validate_quantities(start_quantity, final_quantity)?;
        if harvest_id != existing.harvest_id {
            self.ensure_harvest(harvest_id).await?;
        }

        let lot = sqlx::query_as::<_, ProcessingLot>(
            r#"
            UPDATE processing_lots
            SET lot_code = $1, harvest_id = $2, stage = $3, start_quantity = $4,
                final_quantity = $5, started_on = $6, finished_on = $7
            WHERE id = $8
            RETURNING id, lot_code, harvest_id, stage, start_quantity, final_quantity,
                      started_on, finished_on, created_at
            "#,
        )
        .bind(&lot_code)
        .bind(harvest_id)
        .bind(stage)
        .bind(start_quantity)
        .bind(final_quantity)
        .bind(started_on)
        .bind(finished_on)
        .bind(lot_id)
        .fetch_one(&self.db)
        .await?;

        Ok(lot)
    }

    /// Delete a processing lot (cascades its stock records)
    pub async fn delete_lot(&self, lot_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM processing_lots WHERE id = $1")
            .bind(lot_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Processing lot".to_string()));
        }

        Ok(())
    }
}
