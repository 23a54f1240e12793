//! Notification log endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::OrderId;
use domain::{Notification, NotificationKind};
use serde::{Deserialize, Serialize};

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub order: Option<String>,
}

#[derive(Serialize)]
pub struct MarkAllResponse {
    pub marked: usize,
}

#[derive(Serialize)]
pub struct FormattedMessage {
    pub message: String,
}

/// GET /notifications
///
/// Filters apply in order of precedence: `order`, then `type`, then `unread`.
#[tracing::instrument(skip(state, query))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let service = &state.notifications;

    let mut notifications = match (&query.order, &query.kind) {
        (Some(order), _) => {
            let order_id: OrderId = parse_id(order)?;
            service.for_order(order_id).await?
        }
        (None, Some(kind)) => {
            let kind: NotificationKind = kind.parse().map_err(ApiError::BadRequest)?;
            service.by_kind(kind).await?
        }
        (None, None) if query.unread => service.unread().await?,
        (None, None) => service.list().await?,
    };

    if query.unread {
        notifications.retain(|n| !n.is_read);
    }
    Ok(Json(notifications))
}

/// PATCH /notifications/{id}/read
#[tracing::instrument(skip(state))]
pub async fn mark_as_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, ApiError> {
    let notification = state.notifications.mark_as_read(parse_id(&id)?).await?;
    Ok(Json(notification))
}

/// PATCH /notifications/read
#[tracing::instrument(skip(state))]
pub async fn mark_all_as_read(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MarkAllResponse>, ApiError> {
    let marked = state.notifications.mark_all_as_read().await?;
    Ok(Json(MarkAllResponse { marked }))
}

/// GET /notifications/{id}/message
pub async fn formatted_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FormattedMessage>, ApiError> {
    let message = state.notifications.formatted_message(parse_id(&id)?).await?;
    Ok(Json(FormattedMessage { message }))
}
