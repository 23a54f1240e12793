//! Domain layer for the restaurant order engine.
//!
//! This crate provides:
//! - Table occupancy rules
//! - The Order aggregate with its state machine, items and billing
//! - Field validation for incoming commands
//! - RestaurantService and NotificationService workflows over a
//!   [`Repositories`] bundle

pub mod commands;
pub mod error;
pub mod locks;
pub mod menu;
pub mod order;
pub mod order_store;
pub mod repositories;
pub mod service;
pub mod state_service;
pub mod table;
pub mod validation;

pub use commands::{
    NewMenuItem, NewNote, NewNotification, NewOrder, NewOrderItem, NewSupplement, NewTable,
    UpdateOrder, UpdateOrderItem, UpdateTable,
};
pub use error::{DomainError, ErrorKind, StoreResultExt};
pub use locks::KeyedLocks;
pub use menu::{MenuItem, MenuItemKind};
pub use order::{
    Bill, BillLine, BillSupplement, CoverLine, Money, Note, Notification, NotificationKind, Order,
    OrderError, OrderItem, OrderItemError, OrderItemRecord, OrderRecord, OrderState, OrderTable,
    ParseStateError, SplitLine, Supplement,
};
pub use order_store::OrderStore;
pub use repositories::Repositories;
pub use service::{NotificationService, RestaurantService};
pub use state_service::OrderStateService;
pub use table::{Table, TableError};
pub use validation::{FieldError, ValidationErrors, ValidationLimits};
