//! Menu catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::{MenuItem, NewMenuItem};

use super::AppState;
use crate::error::ApiError;

/// GET /menu
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<MenuItem>>, ApiError> {
    Ok(Json(state.restaurant.list_menu_items().await?))
}

/// POST /menu
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewMenuItem>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    let item = state.restaurant.register_menu_item(req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}
