//! Loading and persisting the order aggregate.
//!
//! An order is stored as several records: the order row, its table link,
//! one row per item plus the item's supplements and notes, and the
//! notification log. [`OrderStore`] assembles and decomposes them.

use common::{OrderId, TableId};
use store::RepositoryExt;

use crate::error::{DomainError, StoreResultExt};
use crate::order::{Order, OrderItem, OrderRecord, OrderTable};
use crate::repositories::Repositories;
use crate::table::Table;

/// Loads and saves [`Order`] aggregates through a [`Repositories`] bundle.
#[derive(Clone)]
pub struct OrderStore {
    repos: Repositories,
}

impl OrderStore {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// Loads the full aggregate.
    ///
    /// Fails with `NotFound` if the order doesn't exist.
    pub async fn load(&self, order_id: OrderId) -> Result<Order, DomainError> {
        let record = self
            .repos
            .orders
            .find_by_id(order_id)
            .await
            .context("loading order")?;
        self.assemble(record).await
    }

    /// Loads every order whose record matches `filter`.
    pub async fn load_where<F>(&self, filter: F) -> Result<Vec<Order>, DomainError>
    where
        F: Fn(&OrderRecord) -> bool,
    {
        let records = self.repos.orders.list_all().await.context("listing orders")?;
        let mut orders = Vec::new();
        for record in records.into_iter().filter(|r| filter(r)) {
            orders.push(self.assemble(record).await?);
        }
        Ok(orders)
    }

    /// Returns the table link of an order, if any.
    pub async fn link(&self, order_id: OrderId) -> Result<Option<OrderTable>, DomainError> {
        let links = self
            .repos
            .order_tables
            .list_by("order_id", order_id.as_uuid())
            .await
            .context("loading order table link")?;
        Ok(links.into_iter().next())
    }

    /// Returns the links of every order seated at `table_id`.
    pub async fn links_for_table(&self, table_id: TableId) -> Result<Vec<OrderTable>, DomainError> {
        self.repos
            .order_tables
            .list_by("table_id", table_id.as_uuid())
            .await
            .context("loading table links")
    }

    async fn assemble(&self, record: OrderRecord) -> Result<Order, DomainError> {
        let order_id = record.id;

        let table = match self.link(order_id).await? {
            Some(link) => self
                .repos
                .tables
                .find_optional(link.table_id)
                .await
                .context("loading order table")?,
            None => None,
        };

        let item_records = self
            .repos
            .order_items
            .list_by("order_id", order_id.as_uuid())
            .await
            .context("loading order items")?;
        let mut items = Vec::with_capacity(item_records.len());
        for item_record in item_records {
            items.push(self.assemble_item(item_record).await?);
        }

        let notifications = self
            .repos
            .notifications
            .list_by("order_id", order_id.as_uuid())
            .await
            .context("loading notifications")?;

        Ok(Order::from_parts(record, table, items, notifications))
    }

    async fn assemble_item(
        &self,
        record: crate::order::OrderItemRecord,
    ) -> Result<OrderItem, DomainError> {
        let menu_item = self
            .repos
            .menu_items
            .find_by_id(record.menu_item_id)
            .await
            .context("loading menu item")?;
        let supplements = self
            .repos
            .supplements
            .list_by("order_item_id", record.id.as_uuid())
            .await
            .context("loading supplements")?;
        let notes = self
            .repos
            .notes
            .list_by("order_item_id", record.id.as_uuid())
            .await
            .context("loading notes")?;
        Ok(OrderItem::from_parts(record, menu_item, supplements, notes))
    }

    /// Saves the order row and the notifications raised since the last commit.
    pub async fn commit(&self, order: &mut Order) -> Result<(), DomainError> {
        self.repos
            .orders
            .save(order.record())
            .await
            .context("saving order")?;

        for notification in order.take_pending_notifications() {
            self.repos
                .notifications
                .save(notification)
                .await
                .context("saving notification")?;
        }
        Ok(())
    }

    /// Saves an item row with its supplements and notes.
    pub async fn save_item(&self, item: &OrderItem) -> Result<(), DomainError> {
        self.repos
            .order_items
            .save(item.record())
            .await
            .context("saving order item")?;
        for supplement in item.supplements() {
            self.repos
                .supplements
                .save(supplement.clone())
                .await
                .context("saving supplement")?;
        }
        for note in item.notes() {
            self.repos
                .notes
                .save(note.clone())
                .await
                .context("saving note")?;
        }
        Ok(())
    }

    /// Deletes an item's supplements and notes, then the item.
    pub async fn delete_item(&self, item: &OrderItem) -> Result<(), DomainError> {
        let item_key = item.id().as_uuid();
        self.repos
            .supplements
            .delete_by("order_item_id", item_key)
            .await
            .context("deleting supplements")?;
        self.repos
            .notes
            .delete_by("order_item_id", item_key)
            .await
            .context("deleting notes")?;
        self.repos
            .order_items
            .delete(item.id())
            .await
            .context("deleting order item")?;
        Ok(())
    }

    /// Deletes the table link, items, notifications and the order row.
    pub async fn delete(&self, order: &Order) -> Result<(), DomainError> {
        let order_key = order.id().as_uuid();
        self.repos
            .order_tables
            .delete_by("order_id", order_key)
            .await
            .context("deleting order table link")?;
        for item in order.items() {
            self.delete_item(item).await?;
        }
        self.repos
            .notifications
            .delete_by("order_id", order_key)
            .await
            .context("deleting notifications")?;
        self.repos
            .orders
            .delete(order.id())
            .await
            .context("deleting order")?;
        Ok(())
    }

    /// Saves a table row.
    pub async fn save_table(&self, table: &Table) -> Result<(), DomainError> {
        self.repos
            .tables
            .save(table.clone())
            .await
            .context("saving table")?;
        Ok(())
    }
}
