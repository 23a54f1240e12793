//! Restaurant workflows spanning orders, tables and the menu.

use std::sync::Arc;

use chrono::Utc;
use common::{MenuItemId, OrderId, OrderItemId, OrderTableId, TableId};
use store::RepositoryExt;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::commands::{
    NewMenuItem, NewNote, NewNotification, NewOrder, NewOrderItem, NewSupplement, NewTable,
    UpdateOrder, UpdateOrderItem, UpdateTable,
};
use crate::error::{DomainError, StoreResultExt};
use crate::locks::KeyedLocks;
use crate::menu::MenuItem;
use crate::order::{
    Bill, Money, Note, Notification, NotificationKind, Order, OrderItem, OrderState, OrderTable,
    Supplement,
};
use crate::order_store::OrderStore;
use crate::repositories::Repositories;
use crate::state_service::OrderStateService;
use crate::table::{Table, TableError};
use crate::validation::{ValidationErrors, ValidationLimits};

/// Service for seating guests and managing their orders.
///
/// Writes touching a table run under that table's lock and writes touching
/// an order run under that order's lock. The order lock is always taken
/// first, and two table locks are taken in id order.
pub struct RestaurantService {
    repos: Repositories,
    orders: OrderStore,
    limits: ValidationLimits,
    states: OrderStateService,
    table_locks: KeyedLocks<TableId>,
    order_locks: Arc<KeyedLocks<OrderId>>,
    /// Serializes table number checks against table saves.
    table_numbers: Mutex<()>,
}

/// Table rows and link as they were before an occupancy change.
struct TableChange {
    tables: Vec<Table>,
    previous_link: Option<OrderTable>,
    link_id: OrderTableId,
}

impl RestaurantService {
    /// Creates a new service over the given repositories.
    pub fn new(repos: Repositories, limits: ValidationLimits) -> Self {
        Self {
            orders: OrderStore::new(repos.clone()),
            repos,
            limits,
            states: OrderStateService::new(),
            table_locks: KeyedLocks::new(),
            order_locks: Arc::new(KeyedLocks::new()),
            table_numbers: Mutex::new(()),
        }
    }

    /// Creates a service backed by in-memory repositories and default limits.
    pub fn in_memory() -> Self {
        Self::new(Repositories::in_memory(), ValidationLimits::default())
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    pub fn state_service(&self) -> &OrderStateService {
        &self.states
    }

    /// Per-order locks, shared with services that write order-owned records.
    pub fn order_locks(&self) -> Arc<KeyedLocks<OrderId>> {
        Arc::clone(&self.order_locks)
    }
}

// Order lifecycle
impl RestaurantService {
    /// Seats a party at a table and opens an order for it.
    ///
    /// The order row, the occupied table and the table link are saved in
    /// that order. If a later step fails the earlier ones are undone in
    /// reverse, so no table stays occupied by an order that doesn't exist.
    #[tracing::instrument(skip(self, cmd), fields(table_id = %cmd.table_id, guests = cmd.guests))]
    pub async fn create_order(&self, cmd: NewOrder) -> Result<Order, DomainError> {
        cmd.validate(&self.limits)?;

        let _table_guard = self.table_locks.acquire(cmd.table_id).await;
        let previous = self
            .repos
            .tables
            .find_by_id(cmd.table_id)
            .await
            .context("loading table")?;

        if !previous.has_capacity(cmd.guests) {
            metrics::counter!("orders_rejected_total", "reason" => "capacity").increment(1);
            tracing::warn!(
                table_number = previous.number(),
                capacity = previous.capacity(),
                occupied = previous.is_occupied(),
                "table cannot seat party"
            );
            return Err(previous.capacity_exceeded(cmd.guests).into());
        }

        let mut table = previous.clone();
        table.occupy(cmd.guests)?;

        let mut order = Order::new(
            Some(table.clone()),
            cmd.guests,
            cmd.cover_charge,
            cmd.service_charge,
            cmd.datetime.unwrap_or_else(Utc::now),
        );
        order.notify(
            format!(
                "Order created for table {} with {} guests",
                table.number(),
                cmd.guests
            ),
            NotificationKind::Info,
        );

        if let Err(e) = self.orders.commit(&mut order).await {
            self.compensate_create(&order, None).await;
            return Err(e);
        }

        if let Err(e) = self.orders.save_table(&table).await {
            self.compensate_create(&order, None).await;
            return Err(e);
        }

        let link = OrderTable::new(order.id(), table.id(), cmd.guests);
        if let Err(e) = self
            .repos
            .order_tables
            .save(link)
            .await
            .context("saving order table link")
        {
            self.compensate_create(&order, Some(&previous)).await;
            return Err(e);
        }

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id(), table_number = table.number(), "order created");
        Ok(order)
    }

    /// Undoes a partially created order. Failures are logged and the
    /// remaining steps still run.
    async fn compensate_create(&self, order: &Order, restore_table: Option<&Table>) {
        metrics::counter!("order_creation_compensations_total").increment(1);
        tracing::warn!(order_id = %order.id(), "order creation failed, compensating");

        if let Some(table) = restore_table {
            if let Err(e) = self.orders.save_table(table).await {
                tracing::warn!(table_id = %table.id(), error = %e, "failed to restore table");
            }
        }
        if let Err(e) = self.orders.delete(order).await {
            tracing::warn!(order_id = %order.id(), error = %e, "failed to delete order");
        }
    }

    /// Moves an order to `new_state`.
    ///
    /// A notification describing the attempt is saved whether or not the
    /// transition is allowed: info on success, warning on rejection.
    /// Reaching a terminal state frees the table.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_state(
        &self,
        order_id: OrderId,
        new_state: OrderState,
    ) -> Result<Order, DomainError> {
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;
        let from = order.state();

        if let Err(e) = order.transition_to(new_state) {
            order.notify(
                format!("Rejected state change from {from} to {new_state}"),
                NotificationKind::Warning,
            );
            self.orders.commit(&mut order).await?;
            metrics::counter!("order_transitions_rejected_total").increment(1);
            tracing::warn!(%order_id, %from, to = %new_state, "state change rejected");
            return Err(e.into());
        }

        if new_state.is_terminal() {
            self.release_table(&mut order).await?;
        }
        order.notify(
            format!("Order state changed from {from} to {new_state}"),
            NotificationKind::Info,
        );
        self.orders.commit(&mut order).await?;

        record_transition(from, new_state);
        tracing::info!(%order_id, %from, to = %new_state, "order state changed");
        Ok(order)
    }

    /// Serves the order and frees its table. A rejected transition leaves
    /// the table occupied.
    #[tracing::instrument(skip(self))]
    pub async fn complete_order(&self, order_id: OrderId) -> Result<Order, DomainError> {
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;
        let from = order.state();

        if let Err(e) = order.transition_to(OrderState::Served) {
            metrics::counter!("order_transitions_rejected_total").increment(1);
            tracing::warn!(%order_id, %from, "order cannot be completed");
            return Err(e.into());
        }

        self.release_table(&mut order).await?;
        order.notify("Order completed and table freed", NotificationKind::Info);
        self.orders.commit(&mut order).await?;

        record_transition(from, OrderState::Served);
        metrics::counter!("orders_completed_total").increment(1);
        tracing::info!(%order_id, total = %order.total(), "order completed");
        Ok(order)
    }

    /// Cancels an order that is still new or preparing and frees its table.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order, DomainError> {
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;
        let from = order.state();

        if let Err(e) = self.states.cancel_order(&mut order) {
            metrics::counter!("order_transitions_rejected_total").increment(1);
            tracing::warn!(%order_id, %from, "order cannot be cancelled");
            return Err(e.into());
        }

        self.release_table(&mut order).await?;
        order.notify("Order cancelled", NotificationKind::Warning);
        self.orders.commit(&mut order).await?;

        record_transition(from, OrderState::Cancelled);
        tracing::info!(%order_id, "order cancelled");
        Ok(order)
    }

    /// Deletes an order with everything it owns and frees its table.
    #[tracing::instrument(skip(self))]
    pub async fn remove_order(&self, order_id: OrderId) -> Result<(), DomainError> {
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;

        if !order.state().is_terminal() {
            self.release_table(&mut order).await?;
        }
        self.orders.delete(&order).await?;

        tracing::info!(%order_id, "order removed");
        Ok(())
    }

    /// Frees the order's table, re-reading it under the table lock. A table
    /// that another open order is linked to stays occupied.
    async fn release_table(&self, order: &mut Order) -> Result<(), DomainError> {
        let Some(table_id) = order.table().map(Table::id) else {
            return Ok(());
        };

        let _table_guard = self.table_locks.acquire(table_id).await;
        if self.has_open_order(table_id, Some(order.id())).await? {
            tracing::warn!(order_id = %order.id(), %table_id, "table still seats another order");
            order.free_table();
            return Ok(());
        }
        if let Some(mut table) = self
            .repos
            .tables
            .find_optional(table_id)
            .await
            .context("loading table")?
        {
            table.free();
            self.orders.save_table(&table).await?;
        }
        order.free_table();
        Ok(())
    }
}

// Order edits
impl RestaurantService {
    /// Changes the party size or charges of an open order, or moves it to
    /// another table.
    ///
    /// A move needs room for the whole party at the target table. The old
    /// table is freed and the link rewritten. If a later step fails, the
    /// tables and the link are put back as they were.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn update_order(
        &self,
        order_id: OrderId,
        cmd: UpdateOrder,
    ) -> Result<Order, DomainError> {
        cmd.validate(&self.limits)?;

        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;
        order.update_details(cmd.guests, cmd.cover_charge, cmd.service_charge)?;

        let link = self.orders.link(order_id).await?;
        let current = link.as_ref().map(|l| l.table_id);
        let change = match cmd.table_id {
            Some(target) if Some(target) != current => {
                Some(self.move_order(&mut order, link, target).await?)
            }
            _ if cmd.guests.is_some() => self.reseat_order(&mut order, link).await?,
            _ => None,
        };

        if cmd.guests.is_some() || cmd.cover_charge.is_some() || cmd.service_charge.is_some() {
            order.notify("Order details updated", NotificationKind::Info);
        }
        if let Err(e) = self.orders.commit(&mut order).await {
            if let Some(change) = change {
                self.undo_table_change(change).await;
            }
            return Err(e);
        }

        tracing::info!(%order_id, guests = order.guests(), "order updated");
        Ok(order)
    }

    async fn move_order(
        &self,
        order: &mut Order,
        link: Option<OrderTable>,
        target_id: TableId,
    ) -> Result<TableChange, DomainError> {
        let source_id = link.as_ref().map(|l| l.table_id);
        let _guards = self.lock_tables(source_id, target_id).await;

        let target_before = self
            .repos
            .tables
            .find_by_id(target_id)
            .await
            .context("loading table")?;
        if !target_before.has_capacity(order.guests()) {
            metrics::counter!("orders_rejected_total", "reason" => "capacity").increment(1);
            tracing::warn!(
                table_number = target_before.number(),
                capacity = target_before.capacity(),
                "target table cannot seat party"
            );
            return Err(target_before.capacity_exceeded(order.guests()).into());
        }
        let source_before = match source_id {
            Some(id) => self
                .repos
                .tables
                .find_optional(id)
                .await
                .context("loading table")?,
            None => None,
        };

        let mut target = target_before.clone();
        target.occupy(order.guests())?;
        let mut new_link = link
            .clone()
            .unwrap_or_else(|| OrderTable::new(order.id(), target_id, order.guests()));
        new_link.table_id = target_id;
        new_link.guests = order.guests();

        let change = TableChange {
            tables: std::iter::once(target_before)
                .chain(source_before.clone())
                .collect(),
            previous_link: link,
            link_id: new_link.id,
        };

        let result = async {
            self.orders.save_table(&target).await?;
            self.repos
                .order_tables
                .save(new_link)
                .await
                .context("saving order table link")?;
            if let Some(mut source) = source_before {
                if !self.has_open_order(source.id(), Some(order.id())).await? {
                    source.free();
                    self.orders.save_table(&source).await?;
                }
            }
            Ok::<_, DomainError>(())
        }
        .await;

        if let Err(e) = result {
            self.undo_table_change(change).await;
            return Err(e);
        }

        order.move_to(target)?;
        Ok(change)
    }

    /// Applies a new party size to the table the order already occupies.
    async fn reseat_order(
        &self,
        order: &mut Order,
        link: Option<OrderTable>,
    ) -> Result<Option<TableChange>, DomainError> {
        let Some(link) = link else {
            return Ok(None);
        };

        let _table_guard = self.table_locks.acquire(link.table_id).await;
        let Some(before) = self
            .repos
            .tables
            .find_optional(link.table_id)
            .await
            .context("loading table")?
        else {
            return Ok(None);
        };

        let mut table = before.clone();
        table.reseat(order.guests())?;
        let mut new_link = link.clone();
        new_link.guests = order.guests();

        let change = TableChange {
            tables: vec![before],
            previous_link: Some(link),
            link_id: new_link.id,
        };
        let result = async {
            self.orders.save_table(&table).await?;
            self.repos
                .order_tables
                .save(new_link)
                .await
                .context("saving order table link")?;
            Ok::<_, DomainError>(())
        }
        .await;

        if let Err(e) = result {
            self.undo_table_change(change).await;
            return Err(e);
        }

        order.refresh_table(table);
        Ok(Some(change))
    }

    /// Restores tables and the link. Failures are logged and the remaining
    /// steps still run.
    async fn undo_table_change(&self, change: TableChange) {
        metrics::counter!("order_update_compensations_total").increment(1);

        for table in &change.tables {
            if let Err(e) = self.orders.save_table(table).await {
                tracing::warn!(table_id = %table.id(), error = %e, "failed to restore table");
            }
        }
        let restored = match change.previous_link {
            Some(link) => self.repos.order_tables.save(link).await.map(|_| ()),
            None => self
                .repos
                .order_tables
                .delete(change.link_id)
                .await
                .map(|_| ()),
        };
        if let Err(e) = restored {
            tracing::warn!(link_id = %change.link_id, error = %e, "failed to restore order table link");
        }
    }

    /// Takes the locks of up to two tables in id order.
    async fn lock_tables(
        &self,
        source: Option<TableId>,
        target: TableId,
    ) -> Vec<OwnedMutexGuard<()>> {
        let mut ids: Vec<TableId> = source.into_iter().chain([target]).collect();
        ids.sort();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.table_locks.acquire(id).await);
        }
        guards
    }

    /// Changes the menu item, quantity or customization of a line.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn update_order_item(
        &self,
        item_id: OrderItemId,
        cmd: UpdateOrderItem,
    ) -> Result<Order, DomainError> {
        cmd.validate(&self.limits)?;

        let order_id = self.owning_order(item_id).await?;
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;

        let menu_item = match cmd.menu_item_id {
            Some(id) => Some(
                self.repos
                    .menu_items
                    .find_by_id(id)
                    .await
                    .context("loading menu item")?,
            ),
            None => None,
        };
        order.update_item(item_id, menu_item, cmd.quantity, cmd.customization)?;

        if let Some(item) = order.item(item_id) {
            self.orders.save_item(item).await?;
        }
        self.orders.commit(&mut order).await?;
        Ok(order)
    }
}

fn record_transition(from: OrderState, to: OrderState) {
    metrics::counter!(
        "order_state_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
}

// Queries
impl RestaurantService {
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.orders.load(order_id).await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.orders.load_where(|_| true).await
    }

    pub async fn get_orders_by_state(&self, state: OrderState) -> Result<Vec<Order>, DomainError> {
        self.orders.load_where(|record| record.state == state).await
    }

    pub async fn get_orders_by_table(&self, table_id: TableId) -> Result<Vec<Order>, DomainError> {
        let mut orders = Vec::new();
        for link in self.orders.links_for_table(table_id).await? {
            orders.push(self.orders.load(link.order_id).await?);
        }
        Ok(orders)
    }

    /// Returns the total, and the per-person share when `ways` is given.
    pub async fn order_total(
        &self,
        order_id: OrderId,
        ways: Option<u32>,
    ) -> Result<(Money, Option<Money>), DomainError> {
        let order = self.orders.load(order_id).await?;
        let share = ways.map(|ways| order.split_bill(ways)).transpose()?;
        Ok((order.total(), share))
    }

    pub async fn split_bill(&self, order_id: OrderId, ways: u32) -> Result<Money, DomainError> {
        let order = self.orders.load(order_id).await?;
        Ok(order.split_bill(ways)?)
    }

    /// Builds the printable bill.
    #[tracing::instrument(skip(self))]
    pub async fn print_bill(&self, order_id: OrderId, split_by: u32) -> Result<Bill, DomainError> {
        let order = self.orders.load(order_id).await?;
        let bill = Bill::for_order(&order, split_by)?;
        metrics::counter!("bills_printed_total").increment(1);
        Ok(bill)
    }
}

// Order composition
impl RestaurantService {
    /// Adds a line, with its supplements and notes, to an order.
    #[tracing::instrument(skip(self, cmd), fields(menu_item_id = %cmd.menu_item_id))]
    pub async fn add_item_to_order(
        &self,
        order_id: OrderId,
        cmd: NewOrderItem,
    ) -> Result<Order, DomainError> {
        cmd.validate(&self.limits)?;

        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;
        let menu_item = self
            .repos
            .menu_items
            .find_by_id(cmd.menu_item_id)
            .await
            .context("loading menu item")?;

        let item_id = order.add_order_item(menu_item, cmd.quantity, cmd.customization)?;
        let item = order.item_mut(item_id)?;
        for supplement in cmd.supplements {
            item.add_supplement(supplement.name, supplement.price)?;
        }
        for note in cmd.notes {
            item.add_note(note);
        }

        if let Some(item) = order.item(item_id) {
            self.orders.save_item(item).await?;
        }
        self.orders.commit(&mut order).await?;

        tracing::debug!(%order_id, %item_id, "item added");
        Ok(order)
    }

    /// Removes a line together with its supplements and notes.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item_from_order(
        &self,
        order_id: OrderId,
        item_id: OrderItemId,
    ) -> Result<Order, DomainError> {
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;

        let item = order.remove_item(item_id)?;
        self.orders.delete_item(&item).await?;
        self.orders.commit(&mut order).await?;
        Ok(order)
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_tip(&self, order_id: OrderId, amount: Money) -> Result<Order, DomainError> {
        let mut errors = ValidationErrors::new();
        errors.check_amount("amount", amount, self.limits.max_charge);
        errors.into_result()?;

        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;
        order.add_tip(amount)?;
        self.orders.commit(&mut order).await?;
        Ok(order)
    }

    /// Appends a caller supplied notification to an order.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn notify_order(
        &self,
        order_id: OrderId,
        cmd: NewNotification,
    ) -> Result<Notification, DomainError> {
        cmd.validate()?;

        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;
        let notification = order.notify(cmd.message, cmd.kind).clone();
        self.orders.commit(&mut order).await?;
        Ok(notification)
    }

    /// Returns an order line with its supplements and notes.
    pub async fn get_order_item(&self, item_id: OrderItemId) -> Result<OrderItem, DomainError> {
        let order = self.order_for_item(item_id).await?;
        order
            .item(item_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("OrderItem", item_id))
    }

    #[tracing::instrument(skip(self, cmd))]
    pub async fn add_supplement(
        &self,
        item_id: OrderItemId,
        cmd: NewSupplement,
    ) -> Result<Supplement, DomainError> {
        cmd.validate(&self.limits)?;

        let order_id = self.owning_order(item_id).await?;
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;

        let supplement = order
            .item_mut(item_id)?
            .add_supplement(cmd.name, cmd.price)?
            .clone();
        self.repos
            .supplements
            .save(supplement.clone())
            .await
            .context("saving supplement")?;
        Ok(supplement)
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_supplement(
        &self,
        item_id: OrderItemId,
        name: &str,
    ) -> Result<Vec<Supplement>, DomainError> {
        let order_id = self.owning_order(item_id).await?;
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;

        let removed = order.item_mut(item_id)?.remove_supplement(name)?;
        for supplement in &removed {
            self.repos
                .supplements
                .delete(supplement.id)
                .await
                .context("deleting supplement")?;
        }
        Ok(removed)
    }

    #[tracing::instrument(skip(self, cmd))]
    pub async fn add_note(&self, item_id: OrderItemId, cmd: NewNote) -> Result<Note, DomainError> {
        cmd.validate()?;

        let order_id = self.owning_order(item_id).await?;
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;

        let note = order.item_mut(item_id)?.add_note(cmd.message).clone();
        self.repos
            .notes
            .save(note.clone())
            .await
            .context("saving note")?;
        Ok(note)
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_note(
        &self,
        item_id: OrderItemId,
        message: &str,
    ) -> Result<Vec<Note>, DomainError> {
        let order_id = self.owning_order(item_id).await?;
        let _order_guard = self.order_locks.acquire(order_id).await;
        let mut order = self.orders.load(order_id).await?;

        let removed = order.item_mut(item_id)?.remove_note(message)?;
        for note in &removed {
            self.repos
                .notes
                .delete(note.id)
                .await
                .context("deleting note")?;
        }
        Ok(removed)
    }

    async fn owning_order(&self, item_id: OrderItemId) -> Result<OrderId, DomainError> {
        let record = self
            .repos
            .order_items
            .find_by_id(item_id)
            .await
            .context("loading order item")?;
        Ok(record.order_id)
    }

    async fn order_for_item(&self, item_id: OrderItemId) -> Result<Order, DomainError> {
        let order_id = self.owning_order(item_id).await?;
        self.orders.load(order_id).await
    }
}

// Tables
impl RestaurantService {
    #[tracing::instrument(skip(self))]
    pub async fn create_table(&self, cmd: NewTable) -> Result<Table, DomainError> {
        cmd.validate(&self.limits)?;

        let _numbers_guard = self.table_numbers.lock().await;
        self.ensure_number_free(cmd.number, None).await?;

        let table = cmd.into_table();
        self.orders.save_table(&table).await?;
        tracing::info!(table_id = %table.id(), number = table.number(), "table created");
        Ok(table)
    }

    pub async fn get_table(&self, table_id: TableId) -> Result<Table, DomainError> {
        self.repos
            .tables
            .find_by_id(table_id)
            .await
            .context("loading table")
    }

    pub async fn list_tables(&self) -> Result<Vec<Table>, DomainError> {
        self.repos.tables.list_all().await.context("listing tables")
    }

    /// Returns true if the table is free and can seat `guests`.
    pub async fn table_has_capacity(
        &self,
        table_id: TableId,
        guests: u32,
    ) -> Result<bool, DomainError> {
        Ok(self.get_table(table_id).await?.has_capacity(guests))
    }

    /// Renumbers or resizes a table.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn update_table(
        &self,
        table_id: TableId,
        cmd: UpdateTable,
    ) -> Result<Table, DomainError> {
        cmd.validate(&self.limits)?;

        let _numbers_guard = self.table_numbers.lock().await;
        let _table_guard = self.table_locks.acquire(table_id).await;
        let mut table = self.get_table(table_id).await?;

        if let Some(number) = cmd.number {
            self.ensure_number_free(number, Some(table_id)).await?;
            table.renumber(number);
        }
        if let Some(capacity) = cmd.capacity {
            table.resize(capacity)?;
        }

        self.orders.save_table(&table).await?;
        tracing::info!(%table_id, number = table.number(), capacity = table.capacity(), "table updated");
        Ok(table)
    }

    /// Frees a table that no open order is using.
    #[tracing::instrument(skip(self))]
    pub async fn free_table(&self, table_id: TableId) -> Result<Table, DomainError> {
        let _table_guard = self.table_locks.acquire(table_id).await;
        let mut table = self.get_table(table_id).await?;
        if self.has_open_order(table_id, None).await? {
            return Err(TableError::InUse {
                table_number: table.number(),
            }
            .into());
        }

        table.free();
        self.orders.save_table(&table).await?;
        Ok(table)
    }

    /// Deletes a table that no open order is using.
    #[tracing::instrument(skip(self))]
    pub async fn delete_table(&self, table_id: TableId) -> Result<(), DomainError> {
        let _table_guard = self.table_locks.acquire(table_id).await;
        let table = self.get_table(table_id).await?;
        if self.has_open_order(table_id, None).await? {
            return Err(TableError::InUse {
                table_number: table.number(),
            }
            .into());
        }

        self.repos
            .tables
            .delete(table_id)
            .await
            .context("deleting table")?;
        tracing::info!(%table_id, "table deleted");
        Ok(())
    }

    /// Returns true if an order other than `except` that is neither served
    /// nor cancelled is linked to the table. Callers hold the table lock.
    async fn has_open_order(
        &self,
        table_id: TableId,
        except: Option<OrderId>,
    ) -> Result<bool, DomainError> {
        for link in self.orders.links_for_table(table_id).await? {
            if Some(link.order_id) == except {
                continue;
            }
            let open = self
                .repos
                .orders
                .find_optional(link.order_id)
                .await
                .context("loading order")?
                .is_some_and(|record| !record.state.is_terminal());
            if open {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Callers hold `table_numbers`.
    async fn ensure_number_free(
        &self,
        number: u32,
        except: Option<TableId>,
    ) -> Result<(), DomainError> {
        let taken = self
            .list_tables()
            .await?
            .iter()
            .any(|t| t.number() == number && Some(t.id()) != except);
        if taken {
            return Err(ValidationErrors::single("number", "is already in use").into());
        }
        Ok(())
    }
}

// Menu
impl RestaurantService {
    #[tracing::instrument(skip(self, cmd), fields(name = %cmd.name))]
    pub async fn register_menu_item(&self, cmd: NewMenuItem) -> Result<MenuItem, DomainError> {
        cmd.validate(&self.limits)?;
        let item = cmd.into_menu_item();
        self.repos
            .menu_items
            .save(item.clone())
            .await
            .context("saving menu item")?;
        Ok(item)
    }

    pub async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem, DomainError> {
        self.repos
            .menu_items
            .find_by_id(id)
            .await
            .context("loading menu item")
    }

    pub async fn list_menu_items(&self) -> Result<Vec<MenuItem>, DomainError> {
        self.repos
            .menu_items
            .list_all()
            .await
            .context("listing menu items")
    }
}
