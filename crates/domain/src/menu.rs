//! Menu catalog entries.
//!
//! The order engine treats a menu item as an opaque priced entry; the kind
//! is resolved once when the record is loaded.

use common::MenuItemId;
use serde::{Deserialize, Serialize};
use store::Record;

use crate::order::Money;

/// The typed part of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "lowercase")]
pub enum MenuItemKind {
    Dish {
        #[serde(default)]
        allergens: Option<String>,
        #[serde(default)]
        is_vegetarian: bool,
        #[serde(default)]
        is_vegan: bool,
        #[serde(default)]
        is_gluten_free: bool,
        #[serde(default)]
        preparation_minutes: Option<u32>,
    },
    Dessert {
        #[serde(default)]
        is_sugar_free: bool,
        #[serde(default)]
        contains_nuts: bool,
        #[serde(default)]
        is_gluten_free: bool,
    },
    Beverage {
        #[serde(default)]
        volume_ml: Option<u32>,
        #[serde(default)]
        is_alcoholic: bool,
        #[serde(default)]
        temperature: Option<String>,
    },
}

impl MenuItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemKind::Dish { .. } => "dish",
            MenuItemKind::Dessert { .. } => "dessert",
            MenuItemKind::Beverage { .. } => "beverage",
        }
    }

    /// Returns dietary remarks worth showing next to an order line.
    pub fn dietary_info(&self) -> Vec<String> {
        let mut info = Vec::new();
        match self {
            MenuItemKind::Dish {
                allergens,
                is_vegetarian,
                is_vegan,
                is_gluten_free,
                ..
            } => {
                if let Some(allergens) = allergens.as_deref().filter(|a| !a.is_empty()) {
                    info.push(format!("allergens: {allergens}"));
                }
                if *is_vegan {
                    info.push("vegan".to_string());
                } else if *is_vegetarian {
                    info.push("vegetarian".to_string());
                }
                if *is_gluten_free {
                    info.push("gluten free".to_string());
                }
            }
            MenuItemKind::Dessert {
                is_sugar_free,
                contains_nuts,
                is_gluten_free,
            } => {
                if *contains_nuts {
                    info.push("contains nuts".to_string());
                }
                if *is_sugar_free {
                    info.push("sugar free".to_string());
                }
                if *is_gluten_free {
                    info.push("gluten free".to_string());
                }
            }
            MenuItemKind::Beverage { is_alcoholic, .. } => {
                if *is_alcoholic {
                    info.push("contains alcohol".to_string());
                }
            }
        }
        info
    }
}

/// A priced catalog entry: dish, dessert or beverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub base_price: Money,
    pub category: String,
    #[serde(flatten)]
    pub kind: MenuItemKind,
}

impl MenuItem {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        base_price: Money,
        category: impl Into<String>,
        kind: MenuItemKind,
    ) -> Self {
        Self {
            id: MenuItemId::new(),
            name: name.into(),
            description: description.into(),
            base_price,
            category: category.into(),
            kind,
        }
    }

    /// Shorthand for a dish with no dietary flags.
    pub fn dish(name: impl Into<String>, base_price: Money) -> Self {
        Self::new(
            name,
            "",
            base_price,
            "main",
            MenuItemKind::Dish {
                allergens: None,
                is_vegetarian: false,
                is_vegan: false,
                is_gluten_free: false,
                preparation_minutes: None,
            },
        )
    }

    pub fn dietary_info(&self) -> Vec<String> {
        self.kind.dietary_info()
    }
}

impl Record for MenuItem {
    type Id = MenuItemId;

    fn record_type() -> &'static str {
        "MenuItem"
    }

    fn id(&self) -> MenuItemId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_resolved_from_item_type() {
        let json = serde_json::json!({
            "id": MenuItemId::new(),
            "name": "Tiramisu",
            "description": "Coffee and mascarpone",
            "base_price": 650,
            "category": "dolci",
            "item_type": "dessert",
            "contains_nuts": true
        });

        let item: MenuItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.kind.as_str(), "dessert");
        assert_eq!(item.dietary_info(), vec!["contains nuts".to_string()]);
    }

    #[test]
    fn unknown_item_type_is_rejected() {
        let json = serde_json::json!({
            "id": MenuItemId::new(),
            "name": "Mystery",
            "description": "",
            "base_price": 100,
            "category": "x",
            "item_type": "snack"
        });
        assert!(serde_json::from_value::<MenuItem>(json).is_err());
    }

    #[test]
    fn dish_dietary_info() {
        let item = MenuItem::new(
            "Risotto",
            "Porcini risotto",
            Money::from_cents(1400),
            "primi",
            MenuItemKind::Dish {
                allergens: Some("milk".to_string()),
                is_vegetarian: true,
                is_vegan: false,
                is_gluten_free: true,
                preparation_minutes: Some(20),
            },
        );
        assert_eq!(
            item.dietary_info(),
            vec!["allergens: milk", "vegetarian", "gluten free"]
        );
    }

    #[test]
    fn beverage_alcohol_warning() {
        let kind = MenuItemKind::Beverage {
            volume_ml: Some(750),
            is_alcoholic: true,
            temperature: Some("cold".to_string()),
        };
        assert_eq!(kind.dietary_info(), vec!["contains alcohol"]);
        assert_eq!(kind.as_str(), "beverage");
    }
}
