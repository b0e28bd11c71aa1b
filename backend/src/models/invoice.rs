//! Invoice records

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Accepted payment modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_mode", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    OrangeMoney,
    MobileMoney,
    Paycard,
}

/// Settlement status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Pending,
}

/// Billing document derived from a sale.
///
/// At most one invoice exists per sale, enforced by a unique index on
/// `sale_id`. The amount defaults to the sale total but may be overridden.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}
