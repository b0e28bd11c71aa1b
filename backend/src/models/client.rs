//! Client records

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A buyer of processed products
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
