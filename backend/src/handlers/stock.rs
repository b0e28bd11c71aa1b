//! HTTP handlers for stock and movement endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{StockMovement, StockRecord};
use crate::services::stock::{AdjustStockInput, CreateStockInput, StockService, UpdateStockInput};
use crate::AppState;

/// Search query for stock listing
#[derive(Debug, Deserialize)]
pub struct StockSearchQuery {
    pub product: Option<String>,
}

/// Response for a manual stock adjustment
#[derive(Debug, Serialize)]
pub struct AdjustStockResponse {
    #[serde(flatten)]
    pub stock: StockRecord,
    pub applied_change: Decimal,
}

/// List stock records
pub async fn list_stocks(
    State(state): State<AppState>,
    Query(query): Query<StockSearchQuery>,
) -> AppResult<Json<Vec<StockRecord>>> {
    let service = StockService::new(state.db);
    let stocks = service.list_stocks(query.product.as_deref()).await?;
    Ok(Json(stocks))
}

/// Get a stock record
pub async fn get_stock(
    State(state): State<AppState>,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<StockRecord>> {
    let service = StockService::new(state.db);
    let stock = service.get_stock(stock_id).await?;
    Ok(Json(stock))
}

/// Create a stock record
pub async fn create_stock(
    State(state): State<AppState>,
    Json(input): Json<CreateStockInput>,
) -> AppResult<Json<StockRecord>> {
    let service = StockService::new(state.db);
    let stock = service.create_stock(input).await?;
    Ok(Json(stock))
}

/// Update a stock record
pub async fn update_stock(
    State(state): State<AppState>,
    Path(stock_id): Path<Uuid>,
    Json(input): Json<UpdateStockInput>,
) -> AppResult<Json<StockRecord>> {
    let service = StockService::new(state.db);
    let stock = service.update_stock(stock_id, input).await?;
    Ok(Json(stock))
}

/// Delete a stock record
pub async fn delete_stock(
    State(state): State<AppState>,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = StockService::new(state.db);
    service.delete_stock(stock_id).await?;
    Ok(Json(()))
}

/// Manually adjust a stock quantity
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(stock_id): Path<Uuid>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<AdjustStockResponse>> {
    let service = StockService::new(state.db);
    let (stock, application) = service.adjust(stock_id, input).await?;
    Ok(Json(AdjustStockResponse {
        stock,
        applied_change: application.applied_change,
    }))
}

/// Movement history for a stock record
pub async fn get_stock_movements(
    State(state): State<AppState>,
    Path(stock_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockService::new(state.db);
    let movements = service.get_movements(stock_id).await?;
    Ok(Json(movements))
}
