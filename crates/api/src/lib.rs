//! HTTP API server for the restaurant order engine.
//!
//! Exposes tables, the menu, orders with their lines, and the notification
//! log as REST resources, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use domain::{NotificationService, Repositories, RestaurantService};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/tables",
            get(routes::tables::list).post(routes::tables::create),
        )
        .route(
            "/tables/{id}",
            get(routes::tables::get)
                .patch(routes::tables::update)
                .delete(routes::tables::delete),
        )
        .route("/tables/{id}/free", post(routes::tables::free))
        .route(
            "/tables/{id}/has_capacity/{guests}",
            get(routes::tables::has_capacity),
        )
        .route("/menu", get(routes::menu::list).post(routes::menu::create))
        .route(
            "/orders",
            get(routes::orders::list).post(routes::orders::create),
        )
        .route(
            "/orders/{id}",
            get(routes::orders::get)
                .patch(routes::orders::update)
                .delete(routes::orders::delete),
        )
        .route("/orders/{id}/state", patch(routes::orders::update_state))
        .route("/orders/{id}/complete", post(routes::orders::complete))
        .route("/orders/{id}/cancel", post(routes::orders::cancel))
        .route("/orders/{id}/items", post(routes::orders::add_item))
        .route(
            "/orders/{id}/items/{item_id}",
            axum::routing::delete(routes::orders::remove_item),
        )
        .route("/orders/{id}/tip", post(routes::orders::add_tip))
        .route("/orders/{id}/bill", get(routes::orders::bill))
        .route("/orders/{id}/total", get(routes::orders::total))
        .route("/orders/{id}/notify", post(routes::orders::notify))
        .route(
            "/order_items/{id}",
            get(routes::order_items::get).patch(routes::order_items::update),
        )
        .route(
            "/order_items/{id}/supplements",
            post(routes::order_items::add_supplement).delete(routes::order_items::remove_supplement),
        )
        .route(
            "/order_items/{id}/notes",
            post(routes::order_items::add_note).delete(routes::order_items::remove_note),
        )
        .route("/notifications", get(routes::notifications::list))
        .route(
            "/notifications/read",
            patch(routes::notifications::mark_all_as_read),
        )
        .route(
            "/notifications/{id}/read",
            patch(routes::notifications::mark_as_read),
        )
        .route(
            "/notifications/{id}/message",
            get(routes::notifications::formatted_message),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over in-memory repositories.
pub fn create_default_state(config: &Config) -> Arc<AppState> {
    let repos = Repositories::in_memory();
    let restaurant = RestaurantService::new(repos.clone(), config.limits());
    let notifications = NotificationService::with_order_locks(repos, restaurant.order_locks());
    Arc::new(AppState {
        restaurant,
        notifications,
    })
}
