//! Sale records

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A quantity of a stocked product sold to a client at a price.
///
/// `quantity_sold` is what the customer ordered; the quantity actually taken
/// from stock may be smaller when a lenient sale was clipped, and is
/// recoverable from the movement ledger. `total_amount` is fixed at write
/// time rather than recomputed from the current price.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub client_id: Uuid,
    pub stock_id: Uuid,
    pub quantity_sold: Decimal,
    pub unit_price: Decimal,
    pub sale_date: NaiveDate,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}
