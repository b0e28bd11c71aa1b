//! HTTP handlers for plot endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Plot;
use crate::services::plot::{CreatePlotInput, PlotService, UpdatePlotInput};
use crate::AppState;

/// Filter for plot listing
#[derive(Debug, Deserialize)]
pub struct PlotListQuery {
    pub producer_id: Option<Uuid>,
}

/// List plots
pub async fn list_plots(
    State(state): State<AppState>,
    Query(query): Query<PlotListQuery>,
) -> AppResult<Json<Vec<Plot>>> {
    let service = PlotService::new(state.db);
    let plots = service.list_plots(query.producer_id).await?;
    Ok(Json(plots))
}

/// Get a plot
pub async fn get_plot(
    State(state): State<AppState>,
    Path(plot_id): Path<Uuid>,
) -> AppResult<Json<Plot>> {
    let service = PlotService::new(state.db);
    let plot = service.get_plot(plot_id).await?;
    Ok(Json(plot))
}

/// Create a plot
pub async fn create_plot(
    State(state): State<AppState>,
    Json(input): Json<CreatePlotInput>,
) -> AppResult<Json<Plot>> {
    let service = PlotService::new(state.db);
    let plot = service.create_plot(input).await?;
    Ok(Json(plot))
}

/// Update a plot
pub async fn update_plot(
    State(state): State<AppState>,
    Path(plot_id): Path<Uuid>,
    Json(input): Json<UpdatePlotInput>,
) -> AppResult<Json<Plot>> {
    let service = PlotService::new(state.db);
    let plot = service.update_plot(plot_id, input).await?;
    Ok(Json(plot))
}

/// Delete a plot
pub async fn delete_plot(
    State(state): State<AppState>,
    Path(plot_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PlotService::new(state.db);
    service.delete_plot(plot_id).await?;
    Ok(Json(()))
}
