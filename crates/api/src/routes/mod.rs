//! HTTP route handlers.

pub mod health;
pub mod menu;
pub mod metrics;
pub mod notifications;
pub mod order_items;
pub mod orders;
pub mod tables;

use std::str::FromStr;

use domain::{NotificationService, RestaurantService};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub restaurant: RestaurantService,
    pub notifications: NotificationService,
}

/// Parses a path identifier, mapping failures to a 400 response.
pub(crate) fn parse_id<T>(id: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
