//! Harvest management service

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::validation::{validate_name, validate_quantity};

use crate::error::{AppError, AppResult};
use crate::models::Harvest;

/// Harvest service
#[derive(Clone)]
pub struct HarvestService {
    db: PgPool,
}

/// Input for recording a harvest
#[derive(Debug, Deserialize)]
pub struct CreateHarvestInput {
    pub fruit: String,
    pub quantity: Decimal,
    pub harvest_date: NaiveDate,
    pub producer_id: Uuid,
    pub plot_id: Uuid,
}

/// Input for updating a harvest
#[derive(Debug, Deserialize)]
pub struct UpdateHarvestInput {
    pub fruit: Option<String>,
    pub quantity: Option<Decimal>,
    pub harvest_date: Option<NaiveDate>,
    pub producer_id: Option<Uuid>,
    pub plot_id: Option<Uuid>,
}

impl HarvestService {
    /// Create a new HarvestService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn ensure_references(&self, producer_id: Uuid, plot_id: Uuid) -> AppResult<()> {
        let producer_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM producers WHERE id = $1)")
                .bind(producer_id)
                .fetch_one(&self.db)
                .await?;
        if !producer_exists {
            return Err(AppError::NotFound("Producer".to_string()));
        }

        let plot_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM plots WHERE id = $1)")
                .bind(plot_id)
                .fetch_one(&self.db)
                .await?;
        if !plot_exists {
            return Err(AppError::NotFound("Plot".to_string()));
        }

        Ok(())
    }

    /// List harvests, optionally filtered by fruit
    pub async fn list_harvests(&self, fruit: Option<&str>) -> AppResult<Vec<Harvest>> {
        let harvests = sqlx::query_as::<_, Harvest>(
            r#"
            SELECT id, fruit, quantity, harvest_date, producer_id, plot_id, created_at
            FROM harvests
            WHERE ($1::text IS NULL OR fruit ILIKE '%' || $1 || '%')
            ORDER BY harvest_date DESC, created_at DESC
            "#,
        )
        .bind(fruit)
        .fetch_all(&self.db)
        .await?;

        Ok(harvests)
    }

    /// Get a harvest by id
    pub async fn get_harvest(&self, harvest_id: Uuid) -> AppResult<Harvest> {
        sqlx::query_as::<_, Harvest>(
            r#"
            SELECT id, fruit, quantity, harvest_date, producer_id, plot_id, created_at
            FROM harvests
            WHERE id = $1
            "#,
        )
        .bind(harvest_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Harvest".to_string()))
    }

    /// Record a harvest
    pub async fn create_harvest(&self, input: CreateHarvestInput) -> AppResult<Harvest> {
        validate_name(&input.fruit).map_err(|msg| AppError::Validation {
            field: "fruit".to_string(),
            message: msg.to_string(),
        })?;
        validate_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;
        self.ensure_references(input.producer_id, input.plot_id)
            .await?;

        let harvest = sqlx::query_as::<_, Harvest>(
            r#"
            INSERT INTO harvests (fruit, quantity, harvest_date, producer_id, plot_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, fruit, quantity, harvest_date, producer_id, plot_id, created_at
            "#,
        )
        .bind(&input.fruit)
        .bind(input.quantity)
        .bind(input.harvest_date)
        .bind(input.producer_id)
        .bind(input.plot_id)
        .fetch_one(&self.db)
        .await?;

        Ok(harvest)
    }

    /// Update a harvest
    pub async fn update_harvest(
        &self,
        harvest_id: Uuid,
        input: UpdateHarvestInput,
    ) -> AppResult<Harvest> {
        let existing = self.get_harvest(harvest_id).await?;

        let fruit = input.fruit.unwrap_or(existing.fruit);
        let quantity = input.quantity.unwrap_or(existing.quantity);
        let harvest_date = input.harvest_date.unwrap_or(existing.harvest_date);
        let producer_id = input.producer_id.unwrap_or(existing.producer_id);
        let plot_id = input.plot_id.unwrap_or(existing.plot_id);

        validate_quantity(quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;
        if producer_id != existing.producer_id || plot_id != existing.plot_id {
            self.ensure_references(producer_id, plot_id).await?;
        }

        let harvest = sqlx::query_as::<_, Harvest>(
            r#"
            UPDATE harvests
            SET fruit = $1, quantity = $2, harvest_date = $3, producer_id = $4, plot_id = $5
            WHERE id = $6
            RETURNING id, fruit, quantity, harvest_date, producer_id, plot_id, created_at
            "#,
        )
        .bind(&fruit)
        .bind(quantity)
        .bind(harvest_date)
        .bind(producer_id)
        .bind(plot_id)
        .bind(harvest_id)
        .fetch_one(&self.db)
        .await?;

        Ok(harvest)
    }

    /// Delete a harvest (cascades its processing lots)
    pub async fn delete_harvest(&self, harvest_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM harvests WHERE id = $1")
            .bind(harvest_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Harvest".to_string()));
        }

        Ok(())
    }
}
