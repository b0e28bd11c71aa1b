//! Producer management service

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::validation::{validate_name, validate_phone};

use crate::error::{AppError, AppResult};
use crate::models::Producer;

/// Producer service
#[derive(Clone)]
pub struct ProducerService {
    db: PgPool,
}

/// Input for creating a producer
#[derive(Debug, Deserialize)]
pub struct CreateProducerInput {
    pub last_name: String,
    pub first_name: String,
    pub address: String,
    pub phone: String,
}

/// Input for updating a producer
#[derive(Debug, Deserialize)]
pub struct UpdateProducerInput {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl ProducerService {
    /// Create a new ProducerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List producers, optionally filtered by name or phone
    pub async fn list_producers(&self, q: Option<&str>) -> AppResult<Vec<Producer>> {
        let producers = sqlx::query_as::<_, Producer>(
            r#"
            SELECT id, last_name, first_name, address, phone, created_at
            FROM producers
            WHERE ($1::text IS NULL
                   OR last_name ILIKE '%' || $1 || '%'
                   OR first_name ILIKE '%' || $1 || '%'
                   OR phone ILIKE '%' || $1 || '%')
            ORDER BY last_name, first_name
            "#,
        )
        .bind(q)
        .fetch_all(&self.db)
        .await?;

        Ok(producers)
    }

    /// Get a producer by id
    pub async fn get_producer(&self, producer_id: Uuid) -> AppResult<Producer> {
        sqlx::query_as::<_, Producer>(
            r#"
            SELECT id, last_name, first_name, address, phone, created_at
            FROM producers
            WHERE id = $1
            "#,
        )
        .bind(producer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Producer".to_string()))
    }

    /// Create a producer
    pub async fn create_producer(&self, input: CreateProducerInput) -> AppResult<Producer> {
        validate_name(&input.last_name).map_err(|msg| AppError::Validation {
            field: "last_name".to_string(),
            message: msg.to_string(),
        })?;
        validate_name(&input.first_name).map_err(|msg| AppError::Validation {
            field: "first_name".to_string(),
            message: msg.to_string(),
        })?;
        validate_phone(&input.phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
        })?;

        let producer = sqlx::query_as::<_, Producer>(
            r#"
            INSERT INTO producers (last_name, first_name, address, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, last_name, first_name, address, phone, created_at
            "#,
        )
        .bind(&input.last_name)
        .bind(&input.first_name)
        .bind(&input.address)
        .bind(&input.phone)
        .fetch_one(&self.db)
        .await
        .map_err(|err| AppError::from_sqlx(err, "phone"))?;

        Ok(producer)
    }

    /// Update a producer
    pub async fn update_producer(
        &self,
        producer_id: Uuid,
        input: UpdateProducerInput,
    ) -> AppResult<Producer> {
        let existing = self.get_producer(producer_id).await?;

        let last_name = input.last_name.unwrap_or(existing.last_name);
        let first_name = input.first_name.unwrap_or(existing.first_name);
        let address = input.address.unwrap_or(existing.address);
        let phone = input.phone.unwrap_or(existing.phone);

        validate_phone(&phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
        })?;

        let producer = sqlx::query_as::<_, Producer>(
            r#"
            UPDATE producers
            SET last_name = $1, first_name = $2, address = $3, phone = $4
            WHERE id = $5
            RETURNING id, last_name, first_name, address, phone, created_at
            "#,
        )
        .bind(&last_name)
        .bind(&first_name)
        .bind(&address)
        .bind(&phone)
        .bind(producer_id)
        .fetch_one(&self.db)
        .await
        .map_err(|err| AppError::from_sqlx(err, "phone"))?;

        Ok(producer)
    }

    /// Delete a producer (cascades plots and harvests)
    pub async fn delete_producer(&self, producer_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM producers WHERE id = $1")
            .bind(producer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Producer".to_string()));
        }

        Ok(())
    }
}
