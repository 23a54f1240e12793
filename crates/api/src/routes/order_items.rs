//! Endpoints addressing a single order line.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::OrderItemId;
use domain::{DomainError, NewNote, NewSupplement, Note, Supplement, UpdateOrderItem};
use serde::Deserialize;

use super::orders::OrderItemResponse;
use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct SupplementQuery {
    pub name: String,
}

#[derive(Deserialize)]
pub struct NoteQuery {
    pub message: String,
}

/// GET /order_items/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderItemResponse>, ApiError> {
    let item = state.restaurant.get_order_item(parse_id(&id)?).await?;
    Ok(Json(OrderItemResponse::from(&item)))
}

/// PATCH /order_items/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderItem>,
) -> Result<Json<OrderItemResponse>, ApiError> {
    let item_id: OrderItemId = parse_id(&id)?;
    let order = state.restaurant.update_order_item(item_id, req).await?;
    let item = order
        .item(item_id)
        .ok_or_else(|| DomainError::not_found("OrderItem", item_id))?;
    Ok(Json(OrderItemResponse::from(item)))
}

/// POST /order_items/{id}/supplements
#[tracing::instrument(skip(state, req))]
pub async fn add_supplement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NewSupplement>,
) -> Result<(StatusCode, Json<Supplement>), ApiError> {
    let supplement = state.restaurant.add_supplement(parse_id(&id)?, req).await?;
    Ok((StatusCode::CREATED, Json(supplement)))
}

/// DELETE /order_items/{id}/supplements?name=...
///
/// Removes every supplement with that name and returns what was removed.
#[tracing::instrument(skip(state, query))]
pub async fn remove_supplement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<SupplementQuery>,
) -> Result<Json<Vec<Supplement>>, ApiError> {
    let removed = state
        .restaurant
        .remove_supplement(parse_id(&id)?, &query.name)
        .await?;
    Ok(Json(removed))
}

/// POST /order_items/{id}/notes
#[tracing::instrument(skip(state, req))]
pub async fn add_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NewNote>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = state.restaurant.add_note(parse_id(&id)?, req).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// DELETE /order_items/{id}/notes?message=...
#[tracing::instrument(skip(state, query))]
pub async fn remove_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<NoteQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let removed = state
        .restaurant
        .remove_note(parse_id(&id)?, &query.message)
        .await?;
    Ok(Json(removed))
}
