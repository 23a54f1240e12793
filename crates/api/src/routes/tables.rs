//! Table endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{NewTable, Table, UpdateTable};
use serde::Serialize;

use super::{AppState, parse_id};
use crate::error::ApiError;

/// GET /tables
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Table>>, ApiError> {
    Ok(Json(state.restaurant.list_tables().await?))
}

/// POST /tables
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewTable>,
) -> Result<(StatusCode, Json<Table>), ApiError> {
    let table = state.restaurant.create_table(req).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// GET /tables/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Table>, ApiError> {
    let table = state.restaurant.get_table(parse_id(&id)?).await?;
    Ok(Json(table))
}

/// PATCH /tables/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTable>,
) -> Result<Json<Table>, ApiError> {
    let table = state.restaurant.update_table(parse_id(&id)?, req).await?;
    Ok(Json(table))
}

#[derive(Serialize)]
pub struct CapacityResponse {
    pub has_capacity: bool,
}

/// GET /tables/{id}/has_capacity/{guests}
pub async fn has_capacity(
    State(state): State<Arc<AppState>>,
    Path((id, guests)): Path<(String, String)>,
) -> Result<Json<CapacityResponse>, ApiError> {
    let guests: u32 = guests
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid guest count: {guests}")))?;
    let has_capacity = state
        .restaurant
        .table_has_capacity(parse_id(&id)?, guests)
        .await?;
    Ok(Json(CapacityResponse { has_capacity }))
}

/// POST /tables/{id}/free
#[tracing::instrument(skip(state))]
pub async fn free(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Table>, ApiError> {
    let table = state.restaurant.free_table(parse_id(&id)?).await?;
    Ok(Json(table))
}

/// DELETE /tables/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.restaurant.delete_table(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
