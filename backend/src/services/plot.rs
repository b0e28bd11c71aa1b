//! Plot management service

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::validation::validate_name;

use crate::error::{AppError, AppResult};
use crate::models::Plot;

/// Plot service
#[derive(Clone)]
pub struct PlotService {
    db: PgPool,
}

/// Input for creating a plot
#[derive(Debug, Deserialize)]
pub struct CreatePlotInput {
    pub name: String,
    pub area_hectares: Decimal,
    pub address: String,
    pub producer_id: Uuid,
}

/// Input for updating a plot
#[derive(Debug, Deserialize)]
pub struct UpdatePlotInput {
    pub name: Option<String>,
    pub area_hectares: Option<Decimal>,
    pub address: Option<String>,
    pub producer_id: Option<Uuid>,
}

impl PlotService {
    /// Create a new PlotService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn ensure_producer(&self, producer_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM producers WHERE id = $1)")
                .bind(producer_id)
                .fetch_one(&self.db)
                .await?;
        if !exists {
            return Err(AppError::NotFound("Producer".to_string()));
        }
        Ok(())
    }

    fn validate_area(area: Decimal) -> AppResult<()> {
        if area <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "area_hectares".to_string(),
                message: "Area must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// List plots, optionally restricted to one producer
    pub async fn list_plots(&self, producer_id: Option<Uuid>) -> AppResult<Vec<Plot>> {
        let plots = sqlx::query_as::<_, Plot>(
            r#"
            SELECT id, name, area_hectares, address, producer_id, created_at
            FROM plots
            WHERE ($1::uuid IS NULL OR producer_id = $1)
            ORDER BY name
            "#,
        )
        .bind(producer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(plots)
    }

    /// Get a plot by id
    pub async fn get_plot(&self, plot_id: Uuid) -> AppResult<Plot> {
        sqlx::query_as::<_, Plot>(
            r#"
            SELECT id, name, area_hectares, address, producer_id, created_at
            FROM plots
            WHERE id = $1
            "#,
        )
        .bind(plot_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Plot".to_string()))
    }

    /// Create a plot
    pub async fn create_plot(&self, input: CreatePlotInput) -> AppResult<Plot> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        Self::validate_area(input.area_hectares)?;
        self.ensure_producer(input.producer_id).await?;

        let plot = sqlx::query_as::<_, Plot>(
            r#"
            INSERT INTO plots (name, area_hectares, address, producer_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, area_hectares, address, producer_id, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.area_hectares)
        .bind(&input.address)
        .bind(input.producer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(plot)
    }

    /// Update a plot
    pub async fn update_plot(&self, plot_id: Uuid, input: UpdatePlotInput) -> AppResult<Plot> {
        let existing = self.get_plot(plot_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let area_hectares = input.area_hectares.unwrap_or(existing.area_hectares);
        let address = input.address.unwrap_or(existing.address);
        let producer_id = input.producer_id.unwrap_or(existing.producer_id);

        Self::validate_area(area_hectares)?;
        if producer_id != existing.producer_id {
            self.ensure_producer(producer_id).await?;
        }

        let plot = sqlx::query_as::<_, Plot>(
            r#"
            UPDATE plots
            SET name = $1, area_hectares = $2, address = $3, producer_id = $4
            WHERE id = $5
            RETURNING id, name, area_hectares, address, producer_id, created_at
            "#,
        )
        .bind(&name)
        .bind(area_hectares)
        .bind(&address)
        .bind(producer_id)
        .bind(plot_id)
        .fetch_one(&self.db)
        .await?;

        Ok(plot)
    }

    /// Delete a plot (cascades its harvests)
    pub async fn delete_plot(&self, plot_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM plots WHERE id = $1")
            .bind(plot_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plot".to_string()));
        }

        Ok(())
    }
}
