//! HTTP handlers for client endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Client;
use crate::services::client::{ClientService, CreateClientInput, UpdateClientInput};
use crate::AppState;

/// Search query for client listing
#[derive(Debug, Deserialize)]
pub struct ClientSearchQuery {
    pub q: Option<String>,
}

/// List clients
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ClientSearchQuery>,
) -> AppResult<Json<Vec<Client>>> {
    let service = ClientService::new(state.db);
    let clients = service.list_clients(query.q.as_deref()).await?;
    Ok(Json(clients))
}

/// Get a client
pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Client>> {
    let service = ClientService::new(state.db);
    let client = service.get_client(client_id).await?;
    Ok(Json(client))
}

/// Create a client
pub async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<CreateClientInput>,
) -> AppResult<Json<Client>> {
    let service = ClientService::new(state.db);
    let client = service.create_client(input).await?;
    Ok(Json(client))
}

/// Update a client
pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(input): Json<UpdateClientInput>,
) -> AppResult<Json<Client>> {
    let service = ClientService::new(state.db);
    let client = service.update_client(client_id, input).await?;
    Ok(Json(client))
}

/// Delete a client
pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ClientService::new(state.db);
    service.delete_client(client_id).await?;
    Ok(Json(()))
}
