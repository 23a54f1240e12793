//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{OrderId, OrderItemId, OrderTableId, TableId};
use serde::{Deserialize, Serialize};
use store::Record;
use uuid::Uuid;

use crate::menu::MenuItem;
use crate::table::Table;

use super::{Money, Notification, NotificationKind, OrderError, OrderItem, OrderState};

/// Order aggregate root.
///
/// Owns its items and notification log and references its table. State
/// only changes along the transitions of [`OrderState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,

    /// Table the party is seated at. `None` once the table was deleted.
    table: Option<Table>,

    /// Order lines, in the order they were added.
    items: Vec<OrderItem>,

    state: OrderState,

    guests: u32,

    /// Per-guest cover charge.
    cover_charge: Money,

    service_charge: Money,

    tip: Money,

    datetime: DateTime<Utc>,

    notifications: Vec<Notification>,

    /// Notifications raised since the last commit.
    #[serde(skip)]
    pending: Vec<Notification>,
}

/// Persisted shape of an order. Items, the table link and notifications
/// are stored as their own records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub state: OrderState,
    pub guests: u32,
    pub cover_charge: Money,
    pub service_charge: Money,
    pub tip: Money,
    pub datetime: DateTime<Utc>,
}

impl Record for OrderRecord {
    type Id = OrderId;

    fn record_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> OrderId {
        self.id
    }
}

/// Join record linking an order to the table it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTable {
    pub id: OrderTableId,
    pub order_id: OrderId,
    pub table_id: TableId,
    pub guests: u32,
}

impl OrderTable {
    pub fn new(order_id: OrderId, table_id: TableId, guests: u32) -> Self {
        Self {
            id: OrderTableId::new(),
            order_id,
            table_id,
            guests,
        }
    }
}

impl Record for OrderTable {
    type Id = OrderTableId;

    fn record_type() -> &'static str {
        "OrderTable"
    }

    fn id(&self) -> OrderTableId {
        self.id
    }

    fn foreign_key(&self, field: &str) -> Option<Uuid> {
        match field {
            "order_id" => Some(self.order_id.as_uuid()),
            "table_id" => Some(self.table_id.as_uuid()),
            _ => None,
        }
    }
}

impl Order {
    /// Creates a new order in the `new` state.
    pub fn new(
        table: Option<Table>,
        guests: u32,
        cover_charge: Money,
        service_charge: Money,
        datetime: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            table,
            items: Vec::new(),
            state: OrderState::New,
            guests,
            cover_charge,
            service_charge,
            tip: Money::zero(),
            datetime,
            notifications: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Rebuilds an order from its stored records.
    pub fn from_parts(
        record: OrderRecord,
        table: Option<Table>,
        items: Vec<OrderItem>,
        notifications: Vec<Notification>,
    ) -> Self {
        Self {
            id: record.id,
            table,
            items,
            state: record.state,
            guests: record.guests,
            cover_charge: record.cover_charge,
            service_charge: record.service_charge,
            tip: record.tip,
            datetime: record.datetime,
            notifications,
            pending: Vec::new(),
        }
    }

    /// Returns the stored shape of this order.
    pub fn record(&self) -> OrderRecord {
        OrderRecord {
            id: self.id,
            state: self.state,
            guests: self.guests,
            cover_charge: self.cover_charge,
            service_charge: self.service_charge,
            tip: self.tip,
            datetime: self.datetime,
        }
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns an item by id.
    pub fn item(&self, item_id: OrderItemId) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id() == item_id)
    }

    pub fn state(&self) -> OrderState {
        self.state
    }

    pub fn guests(&self) -> u32 {
        self.guests
    }

    pub fn cover_charge(&self) -> Money {
        self.cover_charge
    }

    pub fn service_charge(&self) -> Money {
        self.service_charge
    }

    pub fn tip(&self) -> Money {
        self.tip
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Sum of every line subtotal.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    /// `cover_charge * guests`.
    pub fn total_cover_charge(&self) -> Money {
        self.cover_charge.multiply(self.guests)
    }

    /// Items plus cover.
    pub fn sub_total(&self) -> Money {
        self.items_total() + self.total_cover_charge()
    }

    /// Subtotal plus service charge and tip.
    pub fn total(&self) -> Money {
        self.sub_total() + self.service_charge + self.tip
    }

    /// Divides the total evenly, rounding each share to the nearest cent.
    pub fn split_bill(&self, ways: u32) -> Result<Money, OrderError> {
        self.total()
            .split(ways)
            .ok_or(OrderError::InvalidSplit { ways })
    }

    pub fn can_transition_to(&self, target: OrderState) -> bool {
        self.state.can_transition_to(target)
    }
}

// Command methods
impl Order {
    /// Moves the order to `target` if the transition is legal.
    pub fn transition_to(&mut self, target: OrderState) -> Result<(), OrderError> {
        if !self.can_transition_to(target) {
            return Err(OrderError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        Ok(())
    }

    /// Appends a new line for `menu_item` and returns its id.
    pub fn add_order_item(
        &mut self,
        menu_item: MenuItem,
        quantity: u32,
        customization: Option<String>,
    ) -> Result<OrderItemId, OrderError> {
        self.ensure_items_editable("add items")?;
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }

        let message = format!("Added {} x {}", quantity, menu_item.name);
        let item = OrderItem::new(self.id, menu_item, quantity, customization);
        let item_id = item.id();
        self.items.push(item);
        self.notify(message, NotificationKind::Info);

        Ok(item_id)
    }

    /// Removes a line and returns it so its records can be deleted.
    pub fn remove_item(&mut self, item_id: OrderItemId) -> Result<OrderItem, OrderError> {
        self.ensure_items_editable("remove items")?;

        let position = self
            .items
            .iter()
            .position(|i| i.id() == item_id)
            .ok_or(OrderError::ItemNotFound { item_id })?;
        let item = self.items.remove(position);

        self.notify(
            format!("Removed {} x {}", item.quantity(), item.menu_item().name),
            NotificationKind::Info,
        );
        Ok(item)
    }

    /// Changes the menu item, quantity or customization of a line.
    ///
    /// Supplements and notes stay attached to the line.
    pub fn update_item(
        &mut self,
        item_id: OrderItemId,
        menu_item: Option<MenuItem>,
        quantity: Option<u32>,
        customization: Option<String>,
    ) -> Result<(), OrderError> {
        self.ensure_items_editable("update items")?;
        if quantity == Some(0) {
            return Err(OrderError::InvalidQuantity { quantity: 0 });
        }

        let item = self.item_mut(item_id)?;
        if let Some(menu_item) = menu_item {
            item.set_menu_item(menu_item);
        }
        if let Some(quantity) = quantity {
            item.set_quantity(quantity);
        }
        if customization.is_some() {
            item.set_customization(customization);
        }

        let message = format!("Updated {} x {}", item.quantity(), item.menu_item().name);
        self.notify(message, NotificationKind::Info);
        Ok(())
    }

    /// Mutable access to a line, for supplement and note changes.
    pub fn item_mut(&mut self, item_id: OrderItemId) -> Result<&mut OrderItem, OrderError> {
        self.items
            .iter_mut()
            .find(|i| i.id() == item_id)
            .ok_or(OrderError::ItemNotFound { item_id })
    }

    /// Adds to the accumulated tip.
    pub fn add_tip(&mut self, amount: Money) -> Result<(), OrderError> {
        if amount.is_negative() {
            return Err(OrderError::NegativeAmount { amount });
        }
        self.tip += amount;
        Ok(())
    }

    /// Changes the party size and charges of an open order.
    pub fn update_details(
        &mut self,
        guests: Option<u32>,
        cover_charge: Option<Money>,
        service_charge: Option<Money>,
    ) -> Result<(), OrderError> {
        self.ensure_open()?;
        for amount in [cover_charge, service_charge].into_iter().flatten() {
            if amount.is_negative() {
                return Err(OrderError::NegativeAmount { amount });
            }
        }

        if let Some(guests) = guests {
            self.guests = guests;
        }
        if let Some(cover_charge) = cover_charge {
            self.cover_charge = cover_charge;
        }
        if let Some(service_charge) = service_charge {
            self.service_charge = service_charge;
        }
        Ok(())
    }

    /// Seats the order at `table`, which the caller has already occupied.
    pub fn move_to(&mut self, table: Table) -> Result<(), OrderError> {
        self.ensure_open()?;
        let message = match &self.table {
            Some(old) => format!(
                "Order moved from table {} to table {}",
                old.number(),
                table.number()
            ),
            None => format!("Order seated at table {}", table.number()),
        };
        self.table = Some(table);
        self.notify(message, NotificationKind::Info);
        Ok(())
    }

    /// Replaces the table snapshot after its occupancy changed.
    pub(crate) fn refresh_table(&mut self, table: Table) {
        self.table = Some(table);
    }

    /// Frees the referenced table and returns it.
    pub fn free_table(&mut self) -> Option<&Table> {
        let table = self.table.as_mut()?;
        table.free();
        Some(&*table)
    }

    /// Appends a notification to the log and queues it for persistence.
    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) -> &Notification {
        let notification = Notification::new(self.id, message, kind);
        self.pending.push(notification.clone());
        self.notifications.push(notification);
        &self.notifications[self.notifications.len() - 1]
    }

    /// Drains the notifications raised since the last call.
    pub fn take_pending_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    fn ensure_open(&self) -> Result<(), OrderError> {
        if self.state.is_terminal() {
            Err(OrderError::Closed { state: self.state })
        } else {
            Ok(())
        }
    }

    fn ensure_items_editable(&self, action: &'static str) -> Result<(), OrderError> {
        if self.state.can_modify_items() {
            Ok(())
        } else {
            Err(OrderError::ItemsLocked {
                state: self.state,
                action,
            })
        }
    }
}
