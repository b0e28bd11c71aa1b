//! HTTP handlers for dashboard reporting and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::services::reporting::{
    ClientRevenue, DashboardCounts, FruitTotal, MonthlySales, PeriodFilter, ProductSales,
    ProductStock, RecentSale, ReportingService, StageCount,
};
use crate::services::stock::StockService;
use crate::AppState;

/// Export format selector
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// "json" (default) or "csv"
    pub format: Option<String>,
}

/// Combined dashboard payload
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub counts: DashboardCounts,
    pub recent_sales: Vec<RecentSale>,
}

/// Dashboard overview: entity counts and recent activity
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardResponse>> {
    let service = ReportingService::new(state.db);
    let counts = service.get_counts().await?;
    let recent_sales = service.get_recent_sales(8).await?;
    Ok(Json(DashboardResponse {
        counts,
        recent_sales,
    }))
}

/// Top products by revenue over a period
pub async fn get_top_products(
    State(state): State<AppState>,
    Query(filter): Query<PeriodFilter>,
) -> AppResult<Json<Vec<ProductSales>>> {
    let service = ReportingService::new(state.db);
    let products = service.get_top_products(&filter).await?;
    Ok(Json(products))
}

/// Available stock per product
pub async fn get_stock_by_product(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductStock>>> {
    let service = ReportingService::new(state.db);
    let stocks = service.get_stock_by_product().await?;
    Ok(Json(stocks))
}

/// Processing lot counts by stage
pub async fn get_lots_by_stage(State(state): State<AppState>) -> AppResult<Json<Vec<StageCount>>> {
    let service = ReportingService::new(state.db);
    let stages = service.get_lots_by_stage().await?;
    Ok(Json(stages))
}

/// Harvested quantities by fruit
pub async fn get_harvests_by_fruit(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FruitTotal>>> {
    let service = ReportingService::new(state.db);
    let fruits = service.get_harvests_by_fruit().await?;
    Ok(Json(fruits))
}

/// Monthly sales revenue for the trailing twelve months
pub async fn get_monthly_sales(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MonthlySales>>> {
    let service = ReportingService::new(state.db);
    let series = service.get_monthly_sales().await?;
    Ok(Json(series))
}

/// Top clients by revenue
pub async fn get_top_clients(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ClientRevenue>>> {
    let service = ReportingService::new(state.db);
    let clients = service.get_top_clients().await?;
    Ok(Json(clients))
}

/// Export all sales as JSON or CSV
pub async fn export_sales(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let service = ReportingService::new(state.db);
    let rows = service.get_sales_export().await?;

    if query.format.as_deref() == Some("csv") {
        let csv_data = ReportingService::export_to_csv(&rows)?;
        return Ok(csv_response(csv_data, "sales.csv"));
    }
    Ok(Json(rows).into_response())
}

/// Export the full movement ledger as JSON or CSV
pub async fn export_movements(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let service = StockService::new(state.db);
    let movements = service.list_movements(None).await?;

    if query.format.as_deref() == Some("csv") {
        let csv_data = ReportingService::export_to_csv(&movements)?;
        return Ok(csv_response(csv_data, "stock_movements.csv"));
    }
    Ok(Json(movements).into_response())
}

fn csv_response(csv_data: String, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv_data,
    )
        .into_response()
}
