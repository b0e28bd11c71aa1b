//! HTTP handlers for sale endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared::types::PaginatedResponse;

use crate::error::AppResult;
use crate::models::Sale;
use crate::services::sale::{
    CreateSaleInput, SaleDetail, SaleFilter, SaleOutcome, SaleService, UpdateSaleInput,
};
use crate::AppState;

fn sale_service(state: &AppState) -> SaleService {
    SaleService::new(state.db.clone(), state.config.stock.restore_on_sale_delete)
}

/// List sales with search and range filters
pub async fn list_sales(
    State(state): State<AppState>,
    Query(filter): Query<SaleFilter>,
) -> AppResult<Json<PaginatedResponse<Sale>>> {
    let sales = sale_service(&state).list_sales(filter).await?;
    Ok(Json(sales))
}

/// Get a sale with its fulfillment and invoice
pub async fn get_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<SaleDetail>> {
    let detail = sale_service(&state).get_sale_detail(sale_id).await?;
    Ok(Json(detail))
}

/// Record a sale
pub async fn create_sale(
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<Json<SaleOutcome>> {
    let outcome = sale_service(&state).create_sale(input).await?;
    Ok(Json(outcome))
}

/// Amend a sale
pub async fn update_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
    Json(input): Json<UpdateSaleInput>,
) -> AppResult<Json<SaleOutcome>> {
    let outcome = sale_service(&state).amend_sale(sale_id, input).await?;
    Ok(Json(outcome))
}

/// Delete a sale
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    sale_service(&state).delete_sale(sale_id).await?;
    Ok(Json(()))
}
