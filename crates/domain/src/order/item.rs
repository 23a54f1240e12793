//! Order lines and their owned supplements and notes.

use common::{MenuItemId, NoteId, OrderId, OrderItemId, SupplementId};
use serde::{Deserialize, Serialize};
use store::Record;
use thiserror::Error;
use uuid::Uuid;

use crate::menu::MenuItem;

use super::Money;

/// Errors raised when composing a single order line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderItemError {
    #[error("Supplement '{name}' not found on this item")]
    SupplementNotFound { name: String },

    #[error("Note '{message}' not found on this item")]
    NoteNotFound { message: String },

    #[error("Supplement price cannot be negative: {price}")]
    NegativePrice { price: Money },
}

/// A priced extra added to an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplement {
    pub id: SupplementId,
    pub order_item_id: OrderItemId,
    pub name: String,
    pub price: Money,
}

impl Record for Supplement {
    type Id = SupplementId;

    fn record_type() -> &'static str {
        "Supplement"
    }

    fn id(&self) -> SupplementId {
        self.id
    }

    fn foreign_key(&self, field: &str) -> Option<Uuid> {
        match field {
            "order_item_id" => Some(self.order_item_id.as_uuid()),
            _ => None,
        }
    }
}

/// A free-text instruction attached to an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub order_item_id: OrderItemId,
    pub message: String,
}

impl Record for Note {
    type Id = NoteId;

    fn record_type() -> &'static str {
        "Note"
    }

    fn id(&self) -> NoteId {
        self.id
    }

    fn foreign_key(&self, field: &str) -> Option<Uuid> {
        match field {
            "order_item_id" => Some(self.order_item_id.as_uuid()),
            _ => None,
        }
    }
}

/// Persisted shape of an order line. Supplements and notes are stored
/// as their own records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRecord {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub customization: Option<String>,
}

impl Record for OrderItemRecord {
    type Id = OrderItemId;

    fn record_type() -> &'static str {
        "OrderItem"
    }

    fn id(&self) -> OrderItemId {
        self.id
    }

    fn foreign_key(&self, field: &str) -> Option<Uuid> {
        match field {
            "order_id" => Some(self.order_id.as_uuid()),
            "menu_item_id" => Some(self.menu_item_id.as_uuid()),
            _ => None,
        }
    }
}

/// One line of an order: a menu item, a quantity and its extras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    order_id: OrderId,
    menu_item: MenuItem,
    quantity: u32,
    customization: Option<String>,
    supplements: Vec<Supplement>,
    notes: Vec<Note>,
}

impl OrderItem {
    pub(crate) fn new(
        order_id: OrderId,
        menu_item: MenuItem,
        quantity: u32,
        customization: Option<String>,
    ) -> Self {
        Self {
            id: OrderItemId::new(),
            order_id,
            menu_item,
            quantity,
            customization,
            supplements: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Rebuilds a line from its stored records.
    pub fn from_parts(
        record: OrderItemRecord,
        menu_item: MenuItem,
        supplements: Vec<Supplement>,
        notes: Vec<Note>,
    ) -> Self {
        Self {
            id: record.id,
            order_id: record.order_id,
            menu_item,
            quantity: record.quantity,
            customization: record.customization,
            supplements,
            notes,
        }
    }

    pub fn id(&self) -> OrderItemId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn menu_item(&self) -> &MenuItem {
        &self.menu_item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn customization(&self) -> Option<&str> {
        self.customization.as_deref()
    }

    pub fn supplements(&self) -> &[Supplement] {
        &self.supplements
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Price of one unit including supplements.
    pub fn unit_price(&self) -> Money {
        self.menu_item.base_price + self.supplements.iter().map(|s| s.price).sum::<Money>()
    }

    /// `quantity * (base_price + sum of supplement prices)`.
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply(self.quantity)
    }

    /// Dietary remarks of the underlying menu item.
    pub fn dietary_warnings(&self) -> Vec<String> {
        self.menu_item.dietary_info()
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_menu_item(&mut self, menu_item: MenuItem) {
        self.menu_item = menu_item;
    }

    pub(crate) fn set_customization(&mut self, customization: Option<String>) {
        self.customization = customization;
    }

    /// Adds a supplement and returns it.
    pub fn add_supplement(
        &mut self,
        name: impl Into<String>,
        price: Money,
    ) -> Result<&Supplement, OrderItemError> {
        if price.is_negative() {
            return Err(OrderItemError::NegativePrice { price });
        }

        self.supplements.push(Supplement {
            id: SupplementId::new(),
            order_item_id: self.id,
            name: name.into(),
            price,
        });
        Ok(&self.supplements[self.supplements.len() - 1])
    }

    /// Removes every supplement named `name` and returns them.
    pub fn remove_supplement(&mut self, name: &str) -> Result<Vec<Supplement>, OrderItemError> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.supplements)
            .into_iter()
            .partition(|s| s.name == name);
        self.supplements = kept;

        if removed.is_empty() {
            return Err(OrderItemError::SupplementNotFound {
                name: name.to_string(),
            });
        }
        Ok(removed)
    }

    /// Attaches a note and returns it.
    pub fn add_note(&mut self, message: impl Into<String>) -> &Note {
        self.notes.push(Note {
            id: NoteId::new(),
            order_item_id: self.id,
            message: message.into(),
        });
        &self.notes[self.notes.len() - 1]
    }

    /// Removes every note with exactly this message and returns them.
    pub fn remove_note(&mut self, message: &str) -> Result<Vec<Note>, OrderItemError> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.notes)
            .into_iter()
            .partition(|n| n.message == message);
        self.notes = kept;

        if removed.is_empty() {
            return Err(OrderItemError::NoteNotFound {
                message: message.to_string(),
            });
        }
        Ok(removed)
    }

    pub fn has_note(&self, message: &str) -> bool {
        self.notes.iter().any(|n| n.message == message)
    }

    /// Drops all notes, returning them so their records can be deleted.
    pub fn clear_notes(&mut self) -> Vec<Note> {
        std::mem::take(&mut self.notes)
    }

    pub fn record(&self) -> OrderItemRecord {
        OrderItemRecord {
            id: self.id,
            order_id: self.order_id,
            menu_item_id: self.menu_item.id,
            quantity: self.quantity,
            customization: self.customization.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, quantity: u32) -> OrderItem {
        OrderItem::new(
            OrderId::new(),
            MenuItem::dish("Margherita", Money::from_cents(price)),
            quantity,
            None,
        )
    }

    #[test]
    fn subtotal_includes_supplements_per_unit() {
        let mut line = item(1000, 2);
        assert_eq!(line.subtotal(), Money::from_cents(2000));

        line.add_supplement("extra cheese", Money::from_cents(150)).unwrap();
        line.add_supplement("olives", Money::from_cents(50)).unwrap();

        assert_eq!(line.unit_price(), Money::from_cents(1200));
        assert_eq!(line.subtotal(), Money::from_cents(2400));
    }

    #[test]
    fn supplements_are_linked_to_the_item() {
        let mut line = item(1000, 1);
        let supplement = line.add_supplement("basil", Money::zero()).unwrap().clone();
        assert_eq!(supplement.order_item_id, line.id());
        assert_eq!(supplement.price, Money::zero());
    }

    #[test]
    fn negative_supplement_price_is_rejected() {
        let mut line = item(1000, 1);
        let err = line
            .add_supplement("discount", Money::from_cents(-100))
            .unwrap_err();
        assert!(matches!(err, OrderItemError::NegativePrice { .. }));
        assert!(line.supplements().is_empty());
    }

    #[test]
    fn remove_supplement_removes_all_matching() {
        let mut line = item(1000, 1);
        line.add_supplement("cheese", Money::from_cents(100)).unwrap();
        line.add_supplement("ham", Money::from_cents(200)).unwrap();
        line.add_supplement("cheese", Money::from_cents(100)).unwrap();

        let removed = line.remove_supplement("cheese").unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(line.supplements().len(), 1);
        assert_eq!(line.subtotal(), Money::from_cents(1200));
    }

    #[test]
    fn remove_missing_supplement_is_not_found() {
        let mut line = item(1000, 1);
        line.add_supplement("ham", Money::from_cents(200)).unwrap();

        let err = line.remove_supplement("cheese").unwrap_err();
        assert_eq!(
            err,
            OrderItemError::SupplementNotFound {
                name: "cheese".to_string()
            }
        );
        assert_eq!(line.supplements().len(), 1);
    }

    #[test]
    fn notes_add_remove_and_clear() {
        let mut line = item(800, 1);
        line.add_note("no onions");
        line.add_note("well done");
        assert!(line.has_note("no onions"));

        line.remove_note("no onions").unwrap();
        assert!(!line.has_note("no onions"));
        assert!(line.remove_note("no onions").is_err());

        let cleared = line.clear_notes();
        assert_eq!(cleared.len(), 1);
        assert!(line.notes().is_empty());
    }

    #[test]
    fn record_round_trips_through_from_parts() {
        let mut line = item(900, 3);
        line.add_supplement("egg", Money::from_cents(100)).unwrap();
        line.add_note("crispy");

        let rebuilt = OrderItem::from_parts(
            line.record(),
            line.menu_item().clone(),
            line.supplements().to_vec(),
            line.notes().to_vec(),
        );
        assert_eq!(rebuilt, line);
        assert_eq!(rebuilt.subtotal(), Money::from_cents(3000));
    }
}
