//! Repository bundle shared by the services.

use std::sync::Arc;

use store::{InMemoryRepository, Repository};

use crate::menu::MenuItem;
use crate::order::{Note, Notification, OrderItemRecord, OrderRecord, OrderTable, Supplement};
use crate::table::Table;

/// One repository per stored record type.
#[derive(Clone)]
pub struct Repositories {
    pub tables: Arc<dyn Repository<Table>>,
    pub menu_items: Arc<dyn Repository<MenuItem>>,
    pub orders: Arc<dyn Repository<OrderRecord>>,
    pub order_tables: Arc<dyn Repository<OrderTable>>,
    pub order_items: Arc<dyn Repository<OrderItemRecord>>,
    pub supplements: Arc<dyn Repository<Supplement>>,
    pub notes: Arc<dyn Repository<Note>>,
    pub notifications: Arc<dyn Repository<Notification>>,
}

impl Repositories {
    /// Builds a bundle backed by in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            tables: Arc::new(InMemoryRepository::new()),
            menu_items: Arc::new(InMemoryRepository::new()),
            orders: Arc::new(InMemoryRepository::new()),
            order_tables: Arc::new(InMemoryRepository::new()),
            order_items: Arc::new(InMemoryRepository::new()),
            supplements: Arc::new(InMemoryRepository::new()),
            notes: Arc::new(InMemoryRepository::new()),
            notifications: Arc::new(InMemoryRepository::new()),
        }
    }
}

impl Default for Repositories {
    fn default() -> Self {
        Self::in_memory()
    }
}
