//! HTTP handlers for processing lot endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{ProcessingLot, ProcessingStage};
use crate::services::processing::{
    CreateProcessingLotInput, ProcessingService, UpdateProcessingLotInput,
};
use crate::AppState;

/// Filter for processing lot listing
#[derive(Debug, Deserialize)]
pub struct ProcessingListQuery {
    pub stage: Option<ProcessingStage>,
}

/// List processing lots
pub async fn list_processing_lots(
    State(state): State<AppState>,
    Query(query): Query<ProcessingListQuery>,
) -> AppResult<Json<Vec<ProcessingLot>>> {
    let service = ProcessingService::new(state.db);
    let lots = service.list_lots(query.stage).await?;
    Ok(Json(lots))
}

/// Get a processing lot
pub async fn get_processing_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<ProcessingLot>> {
    let service = ProcessingService::new(state.db);
    let lot = service.get_lot(lot_id).await?;
    Ok(Json(lot))
}

/// Create a processing lot
pub async fn create_processing_lot(
    State(state): State<AppState>,
    Json(input): Json<CreateProcessingLotInput>,
) -> AppResult<Json<ProcessingLot>> {
    let service = ProcessingService::new(state.db);
    let lot = service.create_lot(input).await?;
    Ok(Json(lot))
}

/// Update a processing lot
pub async fn update_processing_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
    Json(input): Json<UpdateProcessingLotInput>,
) -> AppResult<Json<ProcessingLot>> {
    let service = ProcessingService::new(state.db);
    let lot = service.update_lot(lot_id, input).await?;
    Ok(Json(lot))
}

/// Delete a processing lot
pub async fn delete_processing_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ProcessingService::new(state.db);
    service.delete_lot(lot_id).await?;
    Ok(Json(()))
}
