//! Harvest records

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A quantity of fruit harvested from a plot
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Harvest {
    pub id: Uuid,
    pub fruit: String,
    pub quantity: Decimal,
    pub harvest_date: NaiveDate,
    pub producer_id: Uuid,
    pub plot_id: Uuid,
    pub created_at: DateTime<Utc>,
}
