//! Plot records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A cultivated plot belonging to a producer
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Plot {
    pub id: Uuid,
    pub name: String,
    pub area_hectares: Decimal,
    pub address: String,
    pub producer_id: Uuid,
    pub created_at: DateTime<Utc>,
}
