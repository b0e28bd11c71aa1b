//! Producer records

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A fruit producer supplying the chain
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Producer {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}
