//! Reporting service for dashboard aggregates and data export
//!
//! Provides entity counts, top products/clients by revenue, stock and
//! harvest breakdowns and a trailing twelve-month sales series.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::types::DateRange;

use crate::error::{AppError, AppResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Entity counts shown on the dashboard
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DashboardCounts {
    pub producers: i64,
    pub plots: i64,
    pub harvests: i64,
    pub processing_lots: i64,
    pub stocks: i64,
    pub sales: i64,
    pub clients: i64,
    pub invoices: i64,
}

/// A recent sale line for the dashboard
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RecentSale {
    pub id: Uuid,
    pub client_name: String,
    pub product: String,
    pub quantity_sold: Decimal,
    pub total_amount: Decimal,
    pub sale_date: NaiveDate,
}

/// Revenue and quantity sold for one product over a period
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProductSales {
    pub product: String,
    pub revenue: Decimal,
    pub quantity: Decimal,
}

/// Available stock aggregated per product
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProductStock {
    pub product: String,
    pub total_stock: Decimal,
}

/// Processing lot count per stage
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct StageCount {
    pub stage: String,
    pub count: i64,
}

/// Harvested quantity per fruit
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FruitTotal {
    pub fruit: String,
    pub quantity: Decimal,
}

/// One month of sales revenue
#[derive(Debug, Serialize)]
pub struct MonthlySales {
    pub month: String,
    pub total: Decimal,
}

/// Revenue per client
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ClientRevenue {
    pub client_name: String,
    pub revenue: Decimal,
}

/// Flattened sale row for export
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SaleExportRow {
    pub id: Uuid,
    pub sale_date: NaiveDate,
    pub client_name: String,
    pub product: String,
    pub quantity_sold: Decimal,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub invoice_number: Option<String>,
}

/// Period selector for the top-products report
#[derive(Debug, Default, Deserialize)]
pub struct PeriodFilter {
    /// One of 7d / 30d / 90d / 365d; ignored when explicit dates are given
    pub period: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Resolve a period filter to a concrete date range ending today by default.
pub fn resolve_period(filter: &PeriodFilter, today: NaiveDate) -> DateRange {
    if let (Some(start), Some(end)) = (filter.start, filter.end) {
        return DateRange { start, end };
    }
    let days = match filter.period.as_deref() {
        Some("7d") => 7,
        Some("90d") => 90,
        Some("365d") => 365,
        _ => 30,
    };
    DateRange {
        start: today - chrono::Duration::days(days),
        end: today,
    }
}

/// First days of the `n` calendar months ending with `today`'s month,
/// oldest first.
pub fn trailing_months(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    let mut months = Vec::with_capacity(n as usize);
    let mut year = today.year();
    let mut month = today.month();
    for _ in 0..n {
        // first_day is always valid for a (year, month) pair
        months.push(NaiveDate::from_ymd_opt(year, month, 1).unwrap());
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    months.reverse();
    months
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Entity counts across the whole chain
    pub async fn get_counts(&self) -> AppResult<DashboardCounts> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            r#"
            SELECT (SELECT COUNT(*) FROM producers)       AS producers,
                   (SELECT COUNT(*) FROM plots)           AS plots,
                   (SELECT COUNT(*) FROM harvests)        AS harvests,
                   (SELECT COUNT(*) FROM processing_lots) AS processing_lots,
                   (SELECT COUNT(*) FROM stocks)          AS stocks,
                   (SELECT COUNT(*) FROM sales)           AS sales,
                   (SELECT COUNT(*) FROM clients)         AS clients,
                   (SELECT COUNT(*) FROM invoices)        AS invoices
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(counts)
    }

    /// Most recent sales for the dashboard
    pub async fn get_recent_sales(&self, limit: i64) -> AppResult<Vec<RecentSale>> {
        let sales = sqlx::query_as::<_, RecentSale>(
            r#"
            SELECT s.id, c.last_name || ' ' || c.first_name AS client_name,
                   st.product, s.quantity_sold, s.total_amount, s.sale_date
            FROM sales s
            JOIN clients c ON c.id = s.client_id
            JOIN stocks st ON st.id = s.stock_id
            ORDER BY s.sale_date DESC, s.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }

    /// Top products by revenue within the period
    pub async fn get_top_products(&self, filter: &PeriodFilter) -> AppResult<Vec<ProductSales>> {
        let range = resolve_period(filter, Utc::now().date_naive());

        let products = sqlx::query_as::<_, ProductSales>(
            r#"
            SELECT st.product,
                   COALESCE(SUM(s.total_amount), 0) AS revenue,
                   COALESCE(SUM(s.quantity_sold), 0) AS quantity
            FROM sales s
            JOIN stocks st ON st.id = s.stock_id
            WHERE s.sale_date >= $1 AND s.sale_date <= $2
            GROUP BY st.product
            ORDER BY revenue DESC
            LIMIT 10
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Available stock per product
    pub async fn get_stock_by_product(&self) -> AppResult<Vec<ProductStock>> {
        let stocks = sqlx::query_as::<_, ProductStock>(
            r#"
            SELECT product, COALESCE(SUM(quantity_available), 0) AS total_stock
            FROM stocks
            GROUP BY product
            ORDER BY total_stock DESC
            LIMIT 12
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(stocks)
    }

    /// Processing lot counts by stage
    pub async fn get_lots_by_stage(&self) -> AppResult<Vec<StageCount>> {
        let stages = sqlx::query_as::<_, StageCount>(
            r#"
            SELECT stage::text AS stage, COUNT(*) AS count
            FROM processing_lots
            GROUP BY stage
            ORDER BY stage
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(stages)
    }

    /// Harvested quantities by fruit
    pub async fn get_harvests_by_fruit(&self) -> AppResult<Vec<FruitTotal>> {
        let fruits = sqlx::query_as::<_, FruitTotal>(
            r#"
            SELECT fruit, COALESCE(SUM(quantity), 0) AS quantity
            FROM harvests
            GROUP BY fruit
            ORDER BY quantity DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(fruits)
    }

    /// Sales revenue per month for the trailing twelve months, months with
    /// no sales reported as zero.
    pub async fn get_monthly_sales(&self) -> AppResult<Vec<MonthlySales>> {
        let today = Utc::now().date_naive();
        let months = trailing_months(today, 12);
        let window_start = months[0];

        let rows = sqlx::query_as::<_, (NaiveDate, Decimal)>(
            r#"
            SELECT date_trunc('month', sale_date)::date AS month,
                   COALESCE(SUM(total_amount), 0) AS total
            FROM sales
            WHERE sale_date >= $1
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(window_start)
        .fetch_all(&self.db)
        .await?;

        Ok(fill_monthly_series(&months, &rows))
    }

    /// Top clients by revenue
    pub async fn get_top_clients(&self) -> AppResult<Vec<ClientRevenue>> {
        let clients = sqlx::query_as::<_, ClientRevenue>(
            r#"
            SELECT c.last_name || ' ' || c.first_name AS client_name,
                   COALESCE(SUM(s.total_amount), 0) AS revenue
            FROM sales s
            JOIN clients c ON c.id = s.client_id
            GROUP BY c.id, c.last_name, c.first_name
            ORDER BY revenue DESC
            LIMIT 8
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(clients)
    }

    /// All sales flattened for export, newest first
    pub async fn get_sales_export(&self) -> AppResult<Vec<SaleExportRow>> {
        let rows = sqlx::query_as::<_, SaleExportRow>(
            r#"
            SELECT s.id, s.sale_date, c.last_name || ' ' || c.first_name AS client_name,
                   st.product, s.quantity_sold, s.unit_price, s.total_amount,
                   i.invoice_number
            FROM sales s
            JOIN clients c ON c.id = s.client_id
            JOIN stocks st ON st.id = s.stock_id
            LEFT JOIN invoices i ON i.sale_id = s.id
            ORDER BY s.sale_date DESC, s.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Export(e.to_string()))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Export(e.to_string()))?,
        )
        .map_err(|e| AppError::Export(e.to_string()))?;

        Ok(csv_data)
    }
}

/// Zero-fill the aggregated month rows onto the full month sequence.
fn fill_monthly_series(months: &[NaiveDate], rows: &[(NaiveDate, Decimal)]) -> Vec<MonthlySales> {
    months
        .iter()
        .map(|month| {
            let total = rows
                .iter()
                .find(|(m, _)| m == month)
                .map(|(_, t)| *t)
                .unwrap_or(Decimal::ZERO);
            MonthlySales {
                month: month.format("%b %Y").to_string(),
                total,
            }
        })
        .collect()
}
