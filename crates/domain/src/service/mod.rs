//! Application services over the domain model.

mod notifications;
mod restaurant;

pub use notifications::NotificationService;
pub use restaurant::RestaurantService;
