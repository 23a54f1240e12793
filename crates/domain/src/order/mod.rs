//! Order aggregate and related types.

mod aggregate;
mod bill;
mod item;
mod notification;
mod state;
mod value_objects;

pub use aggregate::{Order, OrderRecord, OrderTable};
pub use bill::{Bill, BillLine, BillSupplement, CoverLine, SplitLine};
pub use item::{Note, OrderItem, OrderItemError, OrderItemRecord, Supplement};
pub use notification::{Notification, NotificationKind};
pub use state::{OrderState, ParseStateError};
pub use value_objects::Money;

use common::OrderItemId;
use thiserror::Error;

/// Errors raised by order aggregate rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The state machine does not allow this move.
    #[error("Invalid state transition: cannot move from {from} to {to}")]
    InvalidTransition { from: OrderState, to: OrderState },

    /// Items can only change while the order is new or preparing.
    #[error("Cannot {action} while the order is {state}")]
    ItemsLocked {
        state: OrderState,
        action: &'static str,
    },

    /// Item is not part of this order.
    #[error("Order item not found: {item_id}")]
    ItemNotFound { item_id: OrderItemId },

    /// Served and cancelled orders can no longer be edited.
    #[error("Order is {state} and can no longer be changed")]
    Closed { state: OrderState },

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    #[error("Amount cannot be negative: {amount}")]
    NegativeAmount { amount: Money },

    /// A bill can only be split between one or more people.
    #[error("Cannot split the bill {ways} ways (must be at least 1)")]
    InvalidSplit { ways: u32 },
}
