//! Order lifecycle, composition and billing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{OrderId, TableId};
use domain::{
    Bill, Money, NewNotification, NewOrder, NewOrderItem, Note, Notification, Order, OrderItem,
    OrderState, Supplement, UpdateOrder,
};
use serde::{Deserialize, Serialize};

use super::{AppState, parse_id};
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub state: Option<String>,
    pub table: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStateRequest {
    pub state: String,
}

#[derive(Deserialize)]
pub struct TipRequest {
    /// Tip in cents.
    pub amount: Money,
}

#[derive(Debug, Deserialize)]
pub struct BillQuery {
    #[serde(default = "one")]
    pub split: u32,
}

#[derive(Debug, Deserialize)]
pub struct TotalQuery {
    pub guests: Option<u32>,
}

fn one() -> u32 {
    1
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub table_id: Option<TableId>,
    pub table_number: Option<u32>,
    pub state: OrderState,
    pub next_states: Vec<OrderState>,
    pub guests: u32,
    pub datetime: String,
    pub items: Vec<OrderItemResponse>,
    pub cover_charge: Money,
    pub service_charge: Money,
    pub tip: Money,
    pub items_total: Money,
    pub sub_total: Money,
    pub total: Money,
    pub notifications: Vec<Notification>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    pub customization: Option<String>,
    pub unit_price: Money,
    pub subtotal: Money,
    pub supplements: Vec<Supplement>,
    pub notes: Vec<Note>,
    pub dietary_warnings: Vec<String>,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: item.id().to_string(),
            menu_item_id: item.menu_item().id.to_string(),
            name: item.menu_item().name.clone(),
            quantity: item.quantity(),
            customization: item.customization().map(str::to_string),
            unit_price: item.unit_price(),
            subtotal: item.subtotal(),
            supplements: item.supplements().to_vec(),
            notes: item.notes().to_vec(),
            dietary_warnings: item.dietary_warnings(),
        }
    }
}

#[derive(Serialize)]
pub struct TotalResponse {
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_person: Option<Money>,
}

fn to_response(state: &AppState, order: &Order) -> OrderResponse {
    OrderResponse {
        id: order.id(),
        table_id: order.table().map(|t| t.id()),
        table_number: order.table().map(|t| t.number()),
        state: order.state(),
        next_states: state.restaurant.state_service().next_valid_states(order),
        guests: order.guests(),
        datetime: order.datetime().to_rfc3339(),
        items: order.items().iter().map(OrderItemResponse::from).collect(),
        cover_charge: order.cover_charge(),
        service_charge: order.service_charge(),
        tip: order.tip(),
        items_total: order.items_total(),
        sub_total: order.sub_total(),
        total: order.total(),
        notifications: order.notifications().to_vec(),
    }
}

// -- Handlers --

/// POST /orders: seat a party and open an order.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state.restaurant.create_order(req).await?;
    Ok((StatusCode::CREATED, Json(to_response(&state, &order))))
}

/// GET /orders: list orders, optionally filtered by `?state=` or `?table=`.
#[tracing::instrument(skip(state, query))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = match (query.state, query.table) {
        (Some(value), _) => {
            let order_state = state
                .restaurant
                .state_service()
                .parse_state_field(&value, None)
                .map_err(domain::DomainError::from)?;
            state.restaurant.get_orders_by_state(order_state).await?
        }
        (None, Some(table)) => {
            state
                .restaurant
                .get_orders_by_table(parse_id(&table)?)
                .await?
        }
        (None, None) => state.restaurant.list_orders().await?,
    };

    Ok(Json(orders.iter().map(|o| to_response(&state, o)).collect()))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.restaurant.get_order(parse_id(&id)?).await?;
    Ok(Json(to_response(&state, &order)))
}

/// PATCH /orders/{id}: change guests or charges, or move to another table.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrder>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.restaurant.update_order(parse_id(&id)?, req).await?;
    Ok(Json(to_response(&state, &order)))
}

/// DELETE /orders/{id}: remove the order and everything it owns.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.restaurant.remove_order(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /orders/{id}/state
#[tracing::instrument(skip(state, req))]
pub async fn update_state(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStateRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_id(&id)?;
    // Reachability is left to the service so rejected moves are still logged.
    let new_state = state
        .restaurant
        .state_service()
        .parse_state_field(&req.state, None)
        .map_err(domain::DomainError::from)?;

    let order = state
        .restaurant
        .update_order_state(order_id, new_state)
        .await?;
    Ok(Json(to_response(&state, &order)))
}

/// POST /orders/{id}/complete
#[tracing::instrument(skip(state))]
pub async fn complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.restaurant.complete_order(parse_id(&id)?).await?;
    Ok(Json(to_response(&state, &order)))
}

/// POST /orders/{id}/cancel
#[tracing::instrument(skip(state))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.restaurant.cancel_order(parse_id(&id)?).await?;
    Ok(Json(to_response(&state, &order)))
}

/// POST /orders/{id}/items
#[tracing::instrument(skip(state, req))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NewOrderItem>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state
        .restaurant
        .add_item_to_order(parse_id(&id)?, req)
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(&state, &order))))
}

/// DELETE /orders/{id}/items/{item_id}
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .restaurant
        .remove_item_from_order(parse_id(&id)?, parse_id(&item_id)?)
        .await?;
    Ok(Json(to_response(&state, &order)))
}

/// POST /orders/{id}/tip
#[tracing::instrument(skip(state, req))]
pub async fn add_tip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<TipRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.restaurant.add_tip(parse_id(&id)?, req.amount).await?;
    Ok(Json(to_response(&state, &order)))
}

/// GET /orders/{id}/bill?split=N
#[tracing::instrument(skip(state))]
pub async fn bill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<BillQuery>,
) -> Result<Json<Bill>, ApiError> {
    let bill = state
        .restaurant
        .print_bill(parse_id(&id)?, query.split)
        .await?;
    Ok(Json(bill))
}

/// GET /orders/{id}/total?guests=N
#[tracing::instrument(skip(state))]
pub async fn total(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<TotalQuery>,
) -> Result<Json<TotalResponse>, ApiError> {
    let (total, per_person) = state
        .restaurant
        .order_total(parse_id(&id)?, query.guests)
        .await?;
    Ok(Json(TotalResponse { total, per_person }))
}

/// POST /orders/{id}/notify
#[tracing::instrument(skip(state, req))]
pub async fn notify(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NewNotification>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    let notification = state.restaurant.notify_order(order_id, req).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}
