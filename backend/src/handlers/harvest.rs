//! HTTP handlers for harvest endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Harvest;
use crate::services::harvest::{CreateHarvestInput, HarvestService, UpdateHarvestInput};
use crate::AppState;

/// Filter for harvest listing
#[derive(Debug, Deserialize)]
pub struct HarvestListQuery {
    pub fruit: Option<String>,
}

/// List harvests
pub async fn list_harvests(
    State(state): State<AppState>,
    Query(query): Query<HarvestListQuery>,
) -> AppResult<Json<Vec<Harvest>>> {
    let service = HarvestService::new(state.db);
    let harvests = service.list_harvests(query.fruit.as_deref()).await?;
    Ok(Json(harvests))
}

/// Get a harvest
pub async fn get_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
) -> AppResult<Json<Harvest>> {
    let service = HarvestService::new(state.db);
    let harvest = service.get_harvest(harvest_id).await?;
    Ok(Json(harvest))
}

/// Record a harvest
pub async fn create_harvest(
    State(state): State<AppState>,
    Json(input): Json<CreateHarvestInput>,
) -> AppResult<Json<Harvest>> {
    let service = HarvestService::new(state.db);
    let harvest = service.create_harvest(input).await?;
    Ok(Json(harvest))
}

/// Update a harvest
pub async fn update_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
    Json(input): Json<UpdateHarvestInput>,
) -> AppResult<Json<Harvest>> {
    let service = HarvestService::new(state.db);
    let harvest = service.update_harvest(harvest_id, input).await?;
    Ok(Json(harvest))
}

/// Delete a harvest
pub async fn delete_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = HarvestService::new(state.db);
    service.delete_harvest(harvest_id).await?;
    Ok(Json(()))
}
