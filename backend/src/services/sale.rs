//! Sale reconciliation service
//!
//! Orchestrates the quantity-vs-sale invariant across create, amend and
//! delete. The sale row and its ledger movements commit in one transaction:
//! a strict shortfall rolls everything back, so a persisted sale always has
//! its movement. Invoice issuing stays outside the transaction and is
//! best-effort; its failure downgrades to a warning on the result.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::reconcile::sale_total;
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{validate_quantity, validate_unit_price};

use crate::error::{AppError, AppResult};
use crate::models::{Invoice, MovementReason, Sale};
use crate::services::invoice::{InvoiceService, IssueInvoiceInput};
use crate::services::stock::StockService;

/// Sale service driving the reconciliation of stock against sales
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
    /// Policy: write a restoring movement when a sale is deleted
    restore_on_delete: bool,
}

/// Input for recording a sale
#[derive(Debug, Deserialize)]
pub struct CreateSaleInput {
    pub client_id: Uuid,
    pub stock_id: Uuid,
    pub quantity_sold: Decimal,
    pub unit_price: Decimal,
    pub sale_date: NaiveDate,
    /// Refuse instead of clipping when stock is insufficient
    #[serde(default)]
    pub strict: bool,
    /// Issue an invoice together with the sale
    pub invoice: Option<IssueInvoiceInput>,
}

/// Input for amending a sale
#[derive(Debug, Deserialize)]
pub struct UpdateSaleInput {
    pub client_id: Option<Uuid>,
    pub stock_id: Option<Uuid>,
    pub quantity_sold: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub sale_date: Option<NaiveDate>,
    #[serde(default)]
    pub strict: bool,
    /// Create or refresh the sale's invoice inline
    pub invoice: Option<IssueInvoiceInput>,
}

/// Search and range filters for the sale listing
#[derive(Debug, Default, Deserialize)]
pub struct SaleFilter {
    /// Matches client last name, first name or phone
    pub q: Option<String>,
    pub stock_id: Option<Uuid>,
    pub invoice_number: Option<String>,
    pub has_invoice: Option<bool>,
    pub min_quantity: Option<Decimal>,
    pub max_quantity: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Result of a reconciling sale operation
#[derive(Debug, Serialize)]
pub struct SaleOutcome {
    pub sale: Sale,
    /// Quantity actually deducted from stock (smaller than `quantity_sold`
    /// when the deduction was clipped)
    pub fulfilled_quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Invoice>,
    /// Human-readable notice when the operation partially succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Sale with its derived fulfillment and invoice
#[derive(Debug, Serialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    /// Net quantity taken from stock for this sale, from the movement ledger
    pub fulfilled_quantity: Decimal,
    pub invoice: Option<Invoice>,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool, restore_on_delete: bool) -> Self {
        Self {
            db,
            restore_on_delete,
        }
    }

    /// Record a sale and deduct the sold quantity from stock.
    ///
    /// Sale insert and ledger movement share one transaction. In strict mode
    /// an insufficient stock rolls the whole operation back and nothing
    /// persists; in lenient mode the sale keeps the ordered quantity while
    /// the ledger records the clipped deduction, and the outcome carries a
    /// partial-fulfillment warning.
    pub async fn create_sale(&self, input: CreateSaleInput) -> AppResult<SaleOutcome> {
        validate_quantity(input.quantity_sold).map_err(|msg| AppError::Validation {
            field: "quantity_sold".to_string(),
            message: msg.to_string(),
        })?;
        validate_unit_price(input.unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
        })?;

        let client_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
                .bind(input.client_id)
                .fetch_one(&self.db)
                .await?;
        if !client_exists {
            return Err(AppError::NotFound("Client".to_string()));
        }

        let product = sqlx::query_scalar::<_, String>("SELECT product FROM stocks WHERE id = $1")
            .bind(input.stock_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        let total_amount = sale_total(input.quantity_sold, input.unit_price);

        let mut tx = self.db.begin().await?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (client_id, stock_id, quantity_sold, unit_price, sale_date, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, client_id, stock_id, quantity_sold, unit_price, sale_date, total_amount, created_at
            "#,
        )
        .bind(input.client_id)
        .bind(input.stock_id)
        .bind(input.quantity_sold)
        .bind(input.unit_price)
        .bind(input.sale_date)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        let application = StockService::apply_movement(
            &mut tx,
            input.stock_id,
            -input.quantity_sold,
            MovementReason::Sale,
            &format!("Sale {}", sale.id),
            Some(sale.id),
            input.strict,
        )
        .await?;

        tx.commit().await?;

        let fulfilled_quantity = -application.applied_change;
        let mut warning = application.clipped.then(|| {
            format!(
                "Sale created - insufficient stock for '{}'. Fulfilled quantity limited to {} (stock set to zero)",
                product, fulfilled_quantity
            )
        });

        let invoice = match input.invoice {
            Some(invoice_input) => {
                self.issue_best_effort(sale.id, invoice_input, &mut warning)
                    .await
            }
            None => None,
        };

        tracing::info!(sale_id = %sale.id, stock_id = %input.stock_id,
            ordered = %input.quantity_sold, fulfilled = %fulfilled_quantity,
            "sale recorded");

        Ok(SaleOutcome {
            sale,
            fulfilled_quantity,
            invoice,
            warning,
        })
    }

    /// Amend a sale with a two-phase stock adjustment.
    ///
    /// The previously sold quantity is first restored to the old stock, then
    /// the new quantity is deducted from the new (possibly same) stock under
    /// the same strict/lenient policy as creation. Restoring first means an
    /// unchanged stock reference nets out to a delta adjustment instead of a
    /// double deduction. Everything rolls back together on a strict
    /// shortfall.
    pub async fn amend_sale(&self, sale_id: Uuid, input: UpdateSaleInput) -> AppResult<SaleOutcome> {
        let existing = self.get_sale(sale_id).await?;

        let client_id = input.client_id.unwrap_or(existing.client_id);
        let stock_id = input.stock_id.unwrap_or(existing.stock_id);
        let quantity_sold = input.quantity_sold.unwrap_or(existing.quantity_sold);
        let unit_price = input.unit_price.unwrap_or(existing.unit_price);
        let sale_date = input.sale_date.unwrap_or(existing.sale_date);

        validate_quantity(quantity_sold).map_err(|msg| AppError::Validation {
            field: "quantity_sold".to_string(),
            message: msg.to_string(),
        })?;
        validate_unit_price(unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
        })?;

        if client_id != existing.client_id {
            let client_exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
                    .bind(client_id)
                    .fetch_one(&self.db)
                    .await?;
            if !client_exists {
                return Err(AppError::NotFound("Client".to_string()));
            }
        }

        let product = sqlx::query_scalar::<_, String>("SELECT product FROM stocks WHERE id = $1")
            .bind(stock_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        let total_amount = sale_total(quantity_sold, unit_price);

        let mut tx = self.db.begin().await?;

        // Phase one: put the previously sold quantity back on the old stock.
        StockService::apply_movement(
            &mut tx,
            existing.stock_id,
            existing.quantity_sold,
            MovementReason::Restore,
            &format!("Restore from sale {} amendment", sale_id),
            Some(sale_id),
            false,
        )
        .await?;

        // Phase two: deduct the new quantity from the target stock.
        let application = StockService::apply_movement(
            &mut tx,
            stock_id,
            -quantity_sold,
            MovementReason::Sale,
            &format!("Sale {} amended", sale_id),
            Some(sale_id),
            input.strict,
        )
        .await?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales
            SET client_id = $1, stock_id = $2, quantity_sold = $3, unit_price = $4,
                sale_date = $5, total_amount = $6
            WHERE id = $7
            RETURNING id, client_id, stock_id, quantity_sold, unit_price, sale_date, total_amount, created_at
            "#,
        )
        .bind(client_id)
        .bind(stock_id)
        .bind(quantity_sold)
        .bind(unit_price)
        .bind(sale_date)
        .bind(total_amount)
        .bind(sale_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let fulfilled_quantity = -application.applied_change;
        let mut warning = application.clipped.then(|| {
            format!(
                "Sale updated - insufficient stock for '{}'. Fulfilled quantity limited to {} (stock set to zero)",
                product, fulfilled_quantity
            )
        });

        let invoice = match input.invoice {
            Some(invoice_input) => {
                self.issue_best_effort(sale_id, invoice_input, &mut warning)
                    .await
            }
            None => None,
        };

        Ok(SaleOutcome {
            sale,
            fulfilled_quantity,
            invoice,
            warning,
        })
    }

    /// Delete a sale.
    ///
    /// Movement history stays (entries keep a nulled sale reference). Stock
    /// is restored only when the `restore_on_sale_delete` policy is on.
    pub async fn delete_sale(&self, sale_id: Uuid) -> AppResult<()> {
        let existing = self.get_sale(sale_id).await?;

        let mut tx = self.db.begin().await?;

        if self.restore_on_delete {
            StockService::apply_movement(
                &mut tx,
                existing.stock_id,
                existing.quantity_sold,
                MovementReason::Restore,
                &format!("Restore from sale {} deletion", sale_id),
                Some(sale_id),
                false,
            )
            .await?;
        }

        sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Get a sale by id
    pub async fn get_sale(&self, sale_id: Uuid) -> AppResult<Sale> {
        sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, client_id, stock_id, quantity_sold, unit_price, sale_date, total_amount, created_at
            FROM sales
            WHERE id = $1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))
    }

    /// Get a sale together with its fulfillment and invoice
    pub async fn get_sale_detail(&self, sale_id: Uuid) -> AppResult<SaleDetail> {
        let sale = self.get_sale(sale_id).await?;
        let fulfilled_quantity = self.fulfilled_quantity(sale_id).await?;
        let invoice = InvoiceService::new(self.db.clone())
            .get_invoice_for_sale(sale_id)
            .await?;

        Ok(SaleDetail {
            sale,
            fulfilled_quantity,
            invoice,
        })
    }

    /// Net quantity taken from stock for a sale, derived from the ledger
    /// (sale deductions minus restorations).
    pub async fn fulfilled_quantity(&self, sale_id: Uuid) -> AppResult<Decimal> {
        let net = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(-SUM(change), 0) FROM stock_movements WHERE sale_id = $1",
        )
        .bind(sale_id)
        .fetch_one(&self.db)
        .await?;

        Ok(net)
    }

    /// List sales matching the filter, newest first, paginated
    pub async fn list_sales(&self, filter: SaleFilter) -> AppResult<PaginatedResponse<Sale>> {
        let pagination = Pagination {
            page: filter.page.unwrap_or(1).max(1),
            per_page: filter.per_page.unwrap_or(20).clamp(1, 100),
        };

        let where_clause = r#"
            FROM sales s
            JOIN clients c ON c.id = s.client_id
            LEFT JOIN invoices i ON i.sale_id = s.id
            WHERE ($1::text IS NULL
                   OR c.last_name ILIKE '%' || $1 || '%'
                   OR c.first_name ILIKE '%' || $1 || '%'
                   OR c.phone ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR s.stock_id = $2)
              AND ($3::text IS NULL OR i.invoice_number ILIKE '%' || $3 || '%')
              AND ($4::boolean IS NULL OR (i.id IS NOT NULL) = $4)
              AND ($5::numeric IS NULL OR s.quantity_sold >= $5)
              AND ($6::numeric IS NULL OR s.quantity_sold <= $6)
              AND ($7::numeric IS NULL OR s.unit_price >= $7)
              AND ($8::numeric IS NULL OR s.unit_price <= $8)
        "#;

        let total_items = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) {}",
            where_clause
        ))
        .bind(&filter.q)
        .bind(filter.stock_id)
        .bind(&filter.invoice_number)
        .bind(filter.has_invoice)
        .bind(filter.min_quantity)
        .bind(filter.max_quantity)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .fetch_one(&self.db)
        .await?;

        let sales = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT s.id, s.client_id, s.stock_id, s.quantity_sold, s.unit_price,
                   s.sale_date, s.total_amount, s.created_at
            {}
            ORDER BY s.sale_date DESC, s.created_at DESC
            LIMIT $9 OFFSET $10
            "#,
            where_clause
        ))
        .bind(&filter.q)
        .bind(filter.stock_id)
        .bind(&filter.invoice_number)
        .bind(filter.has_invoice)
        .bind(filter.min_quantity)
        .bind(filter.max_quantity)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            pagination: PaginationMeta::new(&pagination, total_items as u64),
            data: sales,
        })
    }

    /// Issue an invoice without letting a failure abort the committed sale.
    async fn issue_best_effort(
        &self,
        sale_id: Uuid,
        input: IssueInvoiceInput,
        warning: &mut Option<String>,
    ) -> Option<Invoice> {
        match InvoiceService::new(self.db.clone()).issue(sale_id, input).await {
            Ok(invoice) => Some(invoice),
            Err(err) => {
                tracing::warn!(%sale_id, error = %err, "invoice could not be issued for sale");
                let notice = "Sale saved but the invoice could not be issued".to_string();
                *warning = Some(match warning.take() {
                    Some(existing) => format!("{}; {}", existing, notice),
                    None => notice,
                });
                None
            }
        }
    }
}
