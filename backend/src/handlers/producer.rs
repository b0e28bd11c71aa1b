//! HTTP handlers for producer endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Producer;
use crate::services::producer::{CreateProducerInput, ProducerService, UpdateProducerInput};
use crate::AppState;

/// Search query for producer listing
#[derive(Debug, Deserialize)]
pub struct ProducerSearchQuery {
    pub q: Option<String>,
}

/// List producers
pub async fn list_producers(
    State(state): State<AppState>,
    Query(query): Query<ProducerSearchQuery>,
) -> AppResult<Json<Vec<Producer>>> {
    let service = ProducerService::new(state.db);
    let producers = service.list_producers(query.q.as_deref()).await?;
    Ok(Json(producers))
}

/// Get a producer
pub async fn get_producer(
    State(state): State<AppState>,
    Path(producer_id): Path<Uuid>,
) -> AppResult<Json<Producer>> {
    let service = ProducerService::new(state.db);
    let producer = service.get_producer(producer_id).await?;
    Ok(Json(producer))
}

/// Create a producer
pub async fn create_producer(
    State(state): State<AppState>,
    Json(input): Json<CreateProducerInput>,
) -> AppResult<Json<Producer>> {
    let service = ProducerService::new(state.db);
    let producer = service.create_producer(input).await?;
    Ok(Json(producer))
}

/// Update a producer
pub async fn update_producer(
    State(state): State<AppState>,
    Path(producer_id): Path<Uuid>,
    Json(input): Json<UpdateProducerInput>,
) -> AppResult<Json<Producer>> {
    let service = ProducerService::new(state.db);
    let producer = service.update_producer(producer_id, input).await?;
    Ok(Json(producer))
}

/// Delete a producer
pub async fn delete_producer(
    State(state): State<AppState>,
    Path(producer_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ProducerService::new(state.db);
    service.delete_producer(producer_id).await?;
    Ok(Json(()))
}
