//! Stock records and their movement ledger

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Unit of measure for a stocked product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "unit_of_measure", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Kg,
    Tonne,
    Sachet,
    Box,
}

/// The on-hand quantity of one processed product lot.
///
/// `quantity_available` is never negative and is only ever mutated through
/// the stock ledger, which records a movement for every change.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockRecord {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub product: String,
    pub unit: UnitOfMeasure,
    pub quantity_available: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a stock quantity changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_reason", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementReason {
    /// Outflow caused by a sale
    Sale,
    /// Inflow restoring a previously sold quantity
    Restore,
    /// Manual correction through the adjust endpoint
    Adjustment,
    /// Direct edit of the stock record
    Modification,
}

/// One immutable, signed quantity change against a stock record.
///
/// Entries are append-only: nothing in the application updates or deletes
/// them, and deleting a sale only nulls the reference.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub sale_id: Option<Uuid>,
    /// Negative for outflows, positive for inflows
    pub change: Decimal,
    pub reason: MovementReason,
    pub note: String,
    pub created_at: DateTime<Utc>,
}
