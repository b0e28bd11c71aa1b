//! Invoice issuing service
//!
//! A sale carries at most one invoice. Issuing is an upsert against the
//! unique `sale_id` index, so concurrent issues for the same sale collapse
//! into one row instead of racing into duplicates.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::validation::validate_name;

use crate::error::{AppError, AppResult};
use crate::models::{Invoice, InvoiceStatus, PaymentMode};

/// Invoice service
#[derive(Clone)]
pub struct InvoiceService {
    db: PgPool,
}

/// Input for issuing (creating or refreshing) an invoice for a sale
#[derive(Debug, Clone, Deserialize)]
pub struct IssueInvoiceInput {
    pub invoice_number: String,
    pub issue_date: Option<NaiveDate>,
    /// Overrides the sale total when supplied
    pub amount: Option<Decimal>,
    pub payment_mode: Option<PaymentMode>,
    pub status: Option<InvoiceStatus>,
}

/// Input for updating an existing invoice
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceInput {
    pub invoice_number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub payment_mode: Option<PaymentMode>,
    pub status: Option<InvoiceStatus>,
}

impl InvoiceService {
    /// Create a new InvoiceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Issue an invoice for a sale, updating the existing one if present.
    ///
    /// The amount defaults to the sale's stored `total_amount`.
    pub async fn issue(&self, sale_id: Uuid, input: IssueInvoiceInput) -> AppResult<Invoice> {
        validate_name(&input.invoice_number).map_err(|msg| AppError::Validation {
            field: "invoice_number".to_string(),
            message: msg.to_string(),
        })?;

        let total_amount =
            sqlx::query_scalar::<_, Decimal>("SELECT total_amount FROM sales WHERE id = $1")
                .bind(sale_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let amount = input.amount.unwrap_or(total_amount);
        if amount < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "amount".to_string(),
                message: "Invoice amount cannot be negative".to_string(),
            });
        }
        let issue_date = input
            .issue_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let payment_mode = input.payment_mode.unwrap_or(PaymentMode::Cash);
        let status = input.status.unwrap_or(InvoiceStatus::Pending);

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (sale_id, invoice_number, issue_date, amount, payment_mode, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (sale_id) DO UPDATE
            SET invoice_number = EXCLUDED.invoice_number,
                issue_date = EXCLUDED.issue_date,
                amount = EXCLUDED.amount,
                payment_mode = EXCLUDED.payment_mode,
                status = EXCLUDED.status
            RETURNING id, sale_id, invoice_number, issue_date, amount, payment_mode, status, created_at
            "#,
        )
        .bind(sale_id)
        .bind(&input.invoice_number)
        .bind(issue_date)
        .bind(amount)
        .bind(payment_mode)
        .bind(status)
        .fetch_one(&self.db)
        .await?;

        Ok(invoice)
    }

    /// List invoices, newest first
    pub async fn list_invoices(&self) -> AppResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, sale_id, invoice_number, issue_date, amount, payment_mode, status, created_at
            FROM invoices
            ORDER BY issue_date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(invoices)
    }

    /// Get an invoice by id
    pub async fn get_invoice(&self, invoice_id: Uuid) -> AppResult<Invoice> {
        sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, sale_id, invoice_number, issue_date, amount, payment_mode, status, created_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))
    }

    /// Get the invoice attached to a sale, if any
    pub async fn get_invoice_for_sale(&self, sale_id: Uuid) -> AppResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, sale_id, invoice_number, issue_date, amount, payment_mode, status, created_at
            FROM invoices
            WHERE sale_id = $1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(invoice)
    }

    /// Update an invoice in place
    pub async fn update_invoice(
        &self,
        invoice_id: Uuid,
        input: UpdateInvoiceInput,
    ) -> AppResult<Invoice> {
        let existing = self.get_invoice(invoice_id).await?;

        let invoice_number = input.invoice_number.unwrap_or(existing.invoice_number);
        validate_name(&invoice_number).map_err(|msg| AppError::Validation {
            field: "invoice_number".to_string(),
            message: msg.to_string(),
        })?;
        let issue_date = input.issue_date.unwrap_or(existing.issue_date);
        let amount = input.amount.unwrap_or(existing.amount);
        if amount < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "amount".to_string(),
                message: "Invoice amount cannot be negative".to_string(),
            });
        }
        let payment_mode = input.payment_mode.unwrap_or(existing.payment_mode);
        let status = input.status.unwrap_or(existing.status);

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET invoice_number = $1, issue_date = $2, amount = $3, payment_mode = $4, status = $5
            WHERE id = $6
            RETURNING id, sale_id, invoice_number, issue_date, amount, payment_mode, status, created_at
            "#,
        )
        .bind(&invoice_number)
        .bind(issue_date)
        .bind(amount)
        .bind(payment_mode)
        .bind(status)
        .bind(invoice_id)
        .fetch_one(&self.db)
        .await?;

        Ok(invoice)
    }

    /// Delete an invoice
    pub async fn delete_invoice(&self, invoice_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(invoice_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Invoice".to_string()));
        }

        Ok(())
    }
}
