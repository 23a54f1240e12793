//! Input commands accepted by the services.
//!
//! Each command validates its own fields against [`ValidationLimits`] and
//! reports every failing field at once.

use chrono::{DateTime, Utc};
use common::{MenuItemId, TableId};
use serde::Deserialize;

use crate::menu::{MenuItem, MenuItemKind};
use crate::order::{Money, NotificationKind};
use crate::table::Table;
use crate::validation::{ValidationErrors, ValidationLimits};

/// Command to register a dining table.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTable {
    pub number: u32,
    pub capacity: u32,
}

impl NewTable {
    pub fn new(number: u32, capacity: u32) -> Self {
        Self { number, capacity }
    }

    pub fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.number == 0 {
            errors.add("number", "must be greater than 0");
        }
        errors.check_range("capacity", self.capacity, 1, limits.max_table_capacity);
        errors.into_result()
    }

    pub fn into_table(self) -> Table {
        Table::new(self.number, self.capacity)
    }
}

/// Partial update of a table. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTable {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl UpdateTable {
    pub fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.number == Some(0) {
            errors.add("number", "must be greater than 0");
        }
        if let Some(capacity) = self.capacity {
            errors.check_range("capacity", capacity, 1, limits.max_table_capacity);
        }
        errors.into_result()
    }
}

/// Command to seat a party and open an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub table_id: TableId,
    pub guests: u32,
    /// Per-guest cover charge.
    #[serde(default)]
    pub cover_charge: Money,
    #[serde(default)]
    pub service_charge: Money,
    /// Defaults to the current time.
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
}

impl NewOrder {
    pub fn new(table_id: TableId, guests: u32) -> Self {
        Self {
            table_id,
            guests,
            cover_charge: Money::zero(),
            service_charge: Money::zero(),
            datetime: None,
        }
    }

    pub fn with_charges(mut self, cover_charge: Money, service_charge: Money) -> Self {
        self.cover_charge = cover_charge;
        self.service_charge = service_charge;
        self
    }

    pub fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_range("guests", self.guests, 1, limits.max_guests);
        errors.check_amount("cover_charge", self.cover_charge, limits.max_charge);
        errors.check_amount("service_charge", self.service_charge, limits.max_charge);
        errors.into_result()
    }
}

/// Partial update of an open order: party size, charges, or a move to
/// another table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrder {
    #[serde(default)]
    pub table_id: Option<TableId>,
    #[serde(default)]
    pub guests: Option<u32>,
    #[serde(default)]
    pub cover_charge: Option<Money>,
    #[serde(default)]
    pub service_charge: Option<Money>,
}

impl UpdateOrder {
    pub fn move_to(table_id: TableId) -> Self {
        Self {
            table_id: Some(table_id),
            ..Self::default()
        }
    }

    pub fn with_guests(mut self, guests: u32) -> Self {
        self.guests = Some(guests);
        self
    }

    pub fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(guests) = self.guests {
            errors.check_range("guests", guests, 1, limits.max_guests);
        }
        if let Some(cover_charge) = self.cover_charge {
            errors.check_amount("cover_charge", cover_charge, limits.max_charge);
        }
        if let Some(service_charge) = self.service_charge {
            errors.check_amount("service_charge", service_charge, limits.max_charge);
        }
        errors.into_result()
    }
}

/// A supplement to attach to an order line.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSupplement {
    pub name: String,
    pub price: Money,
}

impl NewSupplement {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    pub fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.collect_errors(&mut errors, "", limits);
        errors.into_result()
    }

    fn collect_errors(&self, errors: &mut ValidationErrors, prefix: &str, limits: &ValidationLimits) {
        errors.check_length(&format!("{prefix}name"), &self.name, 2, 30);
        errors.check_amount(
            &format!("{prefix}price"),
            self.price,
            limits.max_supplement_price,
        );
    }
}

/// A note to attach to an order line.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
    pub message: String,
}

impl NewNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_length("message", &self.message, 1, 300);
        errors.into_result()
    }
}

/// Command to add a line to an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    #[serde(default)]
    pub customization: Option<String>,
    #[serde(default)]
    pub supplements: Vec<NewSupplement>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl NewOrderItem {
    pub fn new(menu_item_id: MenuItemId, quantity: u32) -> Self {
        Self {
            menu_item_id,
            quantity,
            customization: None,
            supplements: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_customization(mut self, customization: impl Into<String>) -> Self {
        self.customization = Some(customization.into());
        self
    }

    pub fn with_supplement(mut self, name: impl Into<String>, price: Money) -> Self {
        self.supplements.push(NewSupplement::new(name, price));
        self
    }

    pub fn with_note(mut self, message: impl Into<String>) -> Self {
        self.notes.push(message.into());
        self
    }

    pub fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_range("quantity", self.quantity, 1, limits.max_item_quantity);
        if let Some(customization) = &self.customization {
            errors.check_length("customization", customization, 2, 300);
        }
        for (i, supplement) in self.supplements.iter().enumerate() {
            supplement.collect_errors(&mut errors, &format!("supplements[{i}]."), limits);
        }
        for (i, note) in self.notes.iter().enumerate() {
            errors.check_length(&format!("notes[{i}]"), note, 1, 300);
        }
        errors.into_result()
    }
}

/// Partial update of an order line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderItem {
    #[serde(default)]
    pub menu_item_id: Option<MenuItemId>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub customization: Option<String>,
}

impl UpdateOrderItem {
    pub fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(quantity) = self.quantity {
            errors.check_range("quantity", quantity, 1, limits.max_item_quantity);
        }
        if let Some(customization) = &self.customization {
            errors.check_length("customization", customization, 2, 300);
        }
        errors.into_result()
    }
}

/// Command to add a catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub base_price: Money,
    pub category: String,
    #[serde(flatten)]
    pub kind: MenuItemKind,
}

impl NewMenuItem {
    pub fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_length("name", &self.name, 2, 100);
        errors.check_length("description", &self.description, 2, 255);
        errors.check_amount("base_price", self.base_price, limits.max_menu_price);
        errors.check_length("category", &self.category, 2, 30);
        errors.into_result()
    }

    pub fn into_menu_item(self) -> MenuItem {
        MenuItem::new(
            self.name,
            self.description,
            self.base_price,
            self.category,
            self.kind,
        )
    }
}

/// Command to append a notification to an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub message: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: NotificationKind,
}

fn default_kind() -> NotificationKind {
    NotificationKind::Info
}

impl NewNotification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_length("message", &self.message, 1, 300);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_order_reports_all_bad_fields() {
        let cmd = NewOrder::new(TableId::new(), 13)
            .with_charges(Money::from_cents(-1), Money::from_cents(10_000));
        let errors = cmd.validate(&ValidationLimits::default()).unwrap_err();

        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["guests", "cover_charge", "service_charge"]);
    }

    #[test]
    fn new_order_accepts_bounds() {
        let cmd = NewOrder::new(TableId::new(), 12)
            .with_charges(Money::zero(), Money::from_cents(9_999));
        assert!(cmd.validate(&ValidationLimits::default()).is_ok());
    }

    #[test]
    fn updates_only_check_present_fields() {
        let limits = ValidationLimits::default();
        assert!(UpdateOrder::default().validate(&limits).is_ok());
        assert!(UpdateTable::default().validate(&limits).is_ok());
        assert!(UpdateOrderItem::default().validate(&limits).is_ok());

        let errors = UpdateOrder::move_to(TableId::new())
            .with_guests(0)
            .validate(&limits)
            .unwrap_err();
        assert_eq!(errors.errors()[0].field, "guests");

        let table = UpdateTable {
            number: Some(0),
            capacity: Some(40),
        };
        assert_eq!(table.validate(&limits).unwrap_err().errors().len(), 2);

        let item = UpdateOrderItem {
            quantity: Some(11),
            ..UpdateOrderItem::default()
        };
        assert!(item.validate(&limits).is_err());
    }

    #[test]
    fn new_table_capacity_follows_limits() {
        let limits = ValidationLimits {
            max_table_capacity: 6,
            ..ValidationLimits::default()
        };
        assert!(NewTable::new(1, 6).validate(&limits).is_ok());
        assert!(NewTable::new(1, 7).validate(&limits).is_err());
        assert!(NewTable::new(0, 0).validate(&limits).unwrap_err().errors().len() == 2);
    }

    #[test]
    fn order_item_prefixes_nested_fields() {
        let cmd = NewOrderItem::new(MenuItemId::new(), 11)
            .with_customization("x")
            .with_supplement("a", Money::from_euros(100))
            .with_note("");
        let errors = cmd.validate(&ValidationLimits::default()).unwrap_err();

        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "quantity",
                "customization",
                "supplements[0].name",
                "supplements[0].price",
                "notes[0]"
            ]
        );
    }

    #[test]
    fn menu_item_deserializes_with_kind() {
        let json = serde_json::json!({
            "name": "Negroni",
            "description": "Gin, vermouth, bitter",
            "base_price": 900,
            "category": "cocktails",
            "item_type": "beverage",
            "is_alcoholic": true
        });
        let cmd: NewMenuItem = serde_json::from_value(json).unwrap();
        assert!(cmd.validate(&ValidationLimits::default()).is_ok());
        assert_eq!(cmd.into_menu_item().kind.as_str(), "beverage");
    }

    #[test]
    fn notification_defaults_to_info() {
        let cmd: NewNotification =
            serde_json::from_value(serde_json::json!({ "message": "Allergy alert" })).unwrap();
        assert_eq!(cmd.kind, NotificationKind::Info);
        assert!(NewNotification::new("", NotificationKind::Error).validate().is_err());
    }
}
