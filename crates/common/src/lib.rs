//! Shared identifier types for the restaurant order engine.

mod types;

pub use types::{
    MenuItemId, NoteId, NotificationId, OrderId, OrderItemId, OrderTableId, SupplementId, TableId,
};
