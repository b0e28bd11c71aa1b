//! Processing lot records

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stage of a processing lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "processing_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    FreezeDrying,
    Packaging,
    Stored,
}

/// A harvest batch moving through transformation.
///
/// Finalizing a lot (stage = stored) is what feeds the stock table; stock
/// records reference the lot they came from.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProcessingLot {
    pub id: Uuid,
    pub lot_code: String,
    pub harvest_id: Uuid,
    pub stage: ProcessingStage,
    pub start_quantity: Decimal,
    pub final_quantity: Decimal,
    pub started_on: NaiveDate,
    pub finished_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}
