//! Stock ledger service
//!
//! All mutations of `quantity_available` go through [`StockService::apply_movement`],
//! which locks the stock row, applies the planned change and appends exactly one
//! movement entry in the same transaction. Movements are append-only; nothing in
//! the application updates or deletes them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::reconcile::plan_deduction;
use shared::validation::{validate_name, validate_stock_level};

use crate::error::{AppError, AppResult};
use crate::models::{MovementReason, StockMovement, StockRecord, UnitOfMeasure};

/// Stock service owning stock records and their movement ledger
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Result of applying a signed change to a stock record
#[derive(Debug, Clone, Copy)]
pub struct LedgerApplication {
    /// The change actually applied (clipped for oversized outflows)
    pub applied_change: Decimal,
    /// Quantity available after the change
    pub new_quantity: Decimal,
    /// True when a lenient outflow was reduced to the available quantity
    pub clipped: bool,
}

/// Input for creating a stock record
#[derive(Debug, Deserialize)]
pub struct CreateStockInput {
    pub lot_id: Uuid,
    pub product: String,
    pub unit: UnitOfMeasure,
    pub quantity_available: Decimal,
}

/// Input for updating a stock record
#[derive(Debug, Deserialize)]
pub struct UpdateStockInput {
    pub lot_id: Option<Uuid>,
    pub product: Option<String>,
    pub unit: Option<UnitOfMeasure>,
    /// Setting this records a `modification` movement for the delta
    pub quantity_available: Option<Decimal>,
}

/// Input for a manual stock adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    /// Signed change: negative removes from stock, positive adds
    pub change: Decimal,
    pub note: Option<String>,
}

/// Row used while holding the stock lock
#[derive(Debug, sqlx::FromRow)]
struct LockedStockRow {
    product: String,
    quantity_available: Decimal,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply a signed quantity change to a stock record inside the caller's
    /// transaction.
    ///
    /// The stock row is locked `FOR UPDATE`, serializing concurrent
    /// reconciliations per stock record. Outflows larger than the available
    /// quantity are clipped in lenient mode and refused with
    /// [`AppError::InsufficientStock`] in strict mode. Exactly one movement
    /// entry is written per successful call, carrying the applied change.
    pub async fn apply_movement(
        tx: &mut Transaction<'_, Postgres>,
        stock_id: Uuid,
        requested_change: Decimal,
        reason: MovementReason,
        note: &str,
        sale_id: Option<Uuid>,
        strict: bool,
    ) -> AppResult<LedgerApplication> {
        let row = sqlx::query_as::<_, LockedStockRow>(
            "SELECT product, quantity_available FROM stocks WHERE id = $1 FOR UPDATE",
        )
        .bind(stock_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        let application = if requested_change < Decimal::ZERO {
            let plan = plan_deduction(row.quantity_available, -requested_change, strict)
                .map_err(|shortfall| AppError::InsufficientStock {
                    product: row.product.clone(),
                    available: shortfall.available,
                })?;
            LedgerApplication {
                applied_change: -plan.applied,
                new_quantity: plan.new_quantity,
                clipped: plan.clipped,
            }
        } else {
            LedgerApplication {
                applied_change: requested_change,
                new_quantity: row.quantity_available + requested_change,
                clipped: false,
            }
        };

        sqlx::query("UPDATE stocks SET quantity_available = $1, updated_at = now() WHERE id = $2")
            .bind(application.new_quantity)
            .bind(stock_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO stock_movements (stock_id, sale_id, change, reason, note)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(stock_id)
        .bind(sale_id)
        .bind(application.applied_change)
        .bind(reason)
        .bind(note)
        .execute(&mut **tx)
        .await?;

        if application.clipped {
            tracing::warn!(
                %stock_id,
                requested = %requested_change,
                applied = %application.applied_change,
                "stock outflow clipped to available quantity"
            );
        }

        Ok(application)
    }

    /// Manually adjust a stock quantity.
    ///
    /// Adjustments are strict: an outflow larger than the available quantity
    /// is refused rather than clipped, since a manual correction that cannot
    /// be honored is an operator mistake.
    pub async fn adjust(
        &self,
        stock_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<(StockRecord, LedgerApplication)> {
        if input.change == Decimal::ZERO {
            return Err(AppError::Validation {
                field: "change".to_string(),
                message: "Adjustment change cannot be zero".to_string(),
            });
        }

        let note = input.note.unwrap_or_else(|| "Manual adjustment".to_string());

        let mut tx = self.db.begin().await?;
        let application = Self::apply_movement(
            &mut tx,
            stock_id,
            input.change,
            MovementReason::Adjustment,
            &note,
            None,
            true,
        )
        .await?;
        tx.commit().await?;

        let stock = self.get_stock(stock_id).await?;
        Ok((stock, application))
    }

    /// List stock records, optionally filtered by product name
    pub async fn list_stocks(&self, product: Option<&str>) -> AppResult<Vec<StockRecord>> {
        let stocks = sqlx::query_as::<_, StockRecord>(
            r#"
            SELECT id, lot_id, product, unit, quantity_available, created_at, updated_at
            FROM stocks
            WHERE ($1::text IS NULL OR product ILIKE '%' || $1 || '%')
            ORDER BY product, created_at
            "#,
        )
        .bind(product)
        .fetch_all(&self.db)
        .await?;

        Ok(stocks)
    }

    /// Get a stock record by id
    pub async fn get_stock(&self, stock_id: Uuid) -> AppResult<StockRecord> {
        sqlx::query_as::<_, StockRecord>(
            r#"
            SELECT id, lot_id, product, unit, quantity_available, created_at, updated_at
            FROM stocks
            WHERE id = $1
            "#,
        )
        .bind(stock_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))
    }

    /// Create a stock record from a finalized processing lot
    pub async fn create_stock(&self, input: CreateStockInput) -> AppResult<StockRecord> {
        validate_name(&input.product).map_err(|msg| AppError::Validation {
            field: "product".to_string(),
            message: msg.to_string(),
        })?;
        validate_stock_level(input.quantity_available).map_err(|msg| AppError::Validation {
            field: "quantity_available".to_string(),
            message: msg.to_string(),
        })?;

        let lot_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM processing_lots WHERE id = $1)")
                .bind(input.lot_id)
                .fetch_one(&self.db)
                .await?;
        if !lot_exists {
            return Err(AppError::NotFound("Processing lot".to_string()));
        }

        let stock = sqlx::query_as::<_, StockRecord>(
            r#"
            INSERT INTO stocks (lot_id, product, unit, quantity_available)
            VALUES ($1, $2, $3, $4)
            RETURNING id, lot_id, product, unit, quantity_available, created_at, updated_at
            "#,
        )
        .bind(input.lot_id)
        .bind(&input.product)
        .bind(input.unit)
        .bind(input.quantity_available)
        .fetch_one(&self.db)
        .await?;

        Ok(stock)
    }

    /// Update a stock record.
    ///
    /// A quantity change goes through the ledger as a `modification` movement
    /// so the reconciliation invariant keeps holding for direct edits.
    pub async fn update_stock(
        &self,
        stock_id: Uuid,
        input: UpdateStockInput,
    ) -> AppResult<StockRecord> {
        let existing = self.get_stock(stock_id).await?;

        if let Some(lot_id) = input.lot_id {
            let lot_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM processing_lots WHERE id = $1)",
            )
            .bind(lot_id)
            .fetch_one(&self.db)
            .await?;
            if !lot_exists {
                return Err(AppError::NotFound("Processing lot".to_string()));
            }
        }

        let product = input.product.unwrap_or(existing.product);
        validate_name(&product).map_err(|msg| AppError::Validation {
            field: "product".to_string(),
            message: msg.to_string(),
        })?;
        let lot_id = input.lot_id.unwrap_or(existing.lot_id);
        let unit = input.unit.unwrap_or(existing.unit);

        let mut tx = self.db.begin().await?;

        if let Some(new_quantity) = input.quantity_available {
            validate_stock_level(new_quantity).map_err(|msg| AppError::Validation {
                field: "quantity_available".to_string(),
                message: msg.to_string(),
            })?;
            // Re-read under the row lock so the delta is computed against the
            // quantity this transaction actually sees.
            let current = sqlx::query_scalar::<_, Decimal>(
                "SELECT quantity_available FROM stocks WHERE id = $1 FOR UPDATE",
            )
            .bind(stock_id)
            .fetch_one(&mut *tx)
            .await?;
            let delta = new_quantity - current;
            if delta != Decimal::ZERO {
                Self::apply_movement(
                    &mut tx,
                    stock_id,
                    delta,
                    MovementReason::Modification,
                    "Stock record edited",
                    None,
                    true,
                )
                .await?;
            }
        }

        let stock = sqlx::query_as::<_, StockRecord>(
            r#"
            UPDATE stocks
            SET lot_id = $1, product = $2, unit = $3, updated_at = now()
            WHERE id = $4
            RETURNING id, lot_id, product, unit, quantity_available, created_at, updated_at
            "#,
        )
        .bind(lot_id)
        .bind(&product)
        .bind(unit)
        .bind(stock_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(stock)
    }

    /// Delete a stock record (cascades movements and dependent sales)
    pub async fn delete_stock(&self, stock_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM stocks WHERE id = $1")
            .bind(stock_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stock".to_string()));
        }

        Ok(())
    }

    /// Movement history for a stock record, newest first
    pub async fn get_movements(&self, stock_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let stock_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM stocks WHERE id = $1)")
                .bind(stock_id)
                .fetch_one(&self.db)
                .await?;
        if !stock_exists {
            return Err(AppError::NotFound("Stock".to_string()));
        }

        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, stock_id, sale_id, change, reason, note, created_at
            FROM stock_movements
            WHERE stock_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(stock_id)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// All movements across stocks, newest first (for export)
    pub async fn list_movements(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, stock_id, sale_id, change, reason, note, created_at
            FROM stock_movements
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}
