//! Client management service

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::validation::{validate_email, validate_name, validate_phone};

use crate::error::{AppError, AppResult};
use crate::models::Client;

/// Client service
#[derive(Clone)]
pub struct ClientService {
    db: PgPool,
}

/// Input for creating a client
#[derive(Debug, Deserialize)]
pub struct CreateClientInput {
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
}

/// Input for updating a client
#[derive(Debug, Deserialize)]
pub struct UpdateClientInput {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}

impl ClientService {
    /// Create a new ClientService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn validate(last_name: &str, first_name: &str, phone: &str, email: &str) -> AppResult<()> {
        validate_name(last_name).map_err(|msg| AppError::Validation {
            field: "last_name".to_string(),
            message: msg.to_string(),
        })?;
        validate_name(first_name).map_err(|msg| AppError::Validation {
            field: "first_name".to_string(),
            message: msg.to_string(),
        })?;
        validate_phone(phone).map_err(|msg| AppError::Validation {
            field: "phone".to_string(),
            message: msg.to_string(),
        })?;
        validate_email(email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;
        Ok(())
    }

    /// List clients, optionally filtered by name or phone
    pub async fn list_clients(&self, q: Option<&str>) -> AppResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, last_name, first_name, phone, address, email, created_at
            FROM clients
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

        Ok(clients)
    }

    /// Get a client by id
    pub async fn get_client(&self, client_id: Uuid) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, last_name, first_name, phone, address, email, created_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Client".to_string()))
    }

    /// Create a client
    pub async fn create_client(&self, input: CreateClientInput) -> AppResult<Client> {
        Self::validate(
            &input.last_name,
            &input.first_name,
            &input.phone,
            &input.email,
        )?;

        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (last_name, first_name, phone, address, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, last_name, first_name, phone, address, email, created_at
            "#,
        )
        .bind(&input.last_name)
        .bind(&input.first_name)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await
        .map_err(|err| AppError::from_sqlx(err, "phone or email"))?;

        Ok(client)
    }

    /// Update a client
    pub async fn update_client(
        &self,
        client_id: Uuid,
        input: UpdateClientInput,
    ) -> AppResult<Client> {
        let existing = self.get_client(client_id).await?;

        let last_name = input.last_name.unwrap_or(existing.last_name);
        let first_name = input.first_name.unwrap_or(existing.first_name);
        let phone = input.phone.unwrap_or(existing.phone);
        let address = input.address.unwrap_or(existing.address);
        let email = input.email.unwrap_or(existing.email);

        Self::validate(&last_name, &first_name, &phone, &email)?;

        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET last_name = $1, first_name = $2, phone = $3, address = $4, email = $5
            WHERE id = $6
            RETURNING id, last_name, first_name, phone, address, email, created_at
            "#,
        )
        .bind(&last_name)
        .bind(&first_name)
        .bind(&phone)
        .bind(&address)
        .bind(&email)
        .bind(client_id)
        .fetch_one(&self.db)
        .await
        .map_err(|err| AppError::from_sqlx(err, "phone or email"))?;

        Ok(client)
    }

    /// Delete a client (cascades their sales)
    pub async fn delete_client(&self, client_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Client".to_string()));
        }

        Ok(())
    }
}
