//! Structured bill breakdown.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Money, Order, OrderError};

/// A priced extra as printed on the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSupplement {
    pub name: String,
    pub price: Money,
}

/// One order line as printed on the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub subtotal: Money,
    /// Ready-to-print `"2 x €10.00 = €20.00"` rendering.
    pub price_line: String,
    pub supplements: Vec<BillSupplement>,
}

/// Cover charge breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLine {
    pub charge: Money,
    pub guests: u32,
    pub total: Money,
}

/// Per-person share when the bill is split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitLine {
    pub ways: u32,
    pub per_person: Money,
}

/// Printable bill for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub table_number: Option<u32>,
    pub items: Vec<BillLine>,
    pub subtotal: Money,
    pub cover: CoverLine,
    pub service: Money,
    pub tip: Money,
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitLine>,
}

impl Bill {
    /// Builds the bill of `order`. A split section is included only when
    /// `split_by` is greater than one.
    pub fn for_order(order: &Order, split_by: u32) -> Result<Self, OrderError> {
        let per_person = order.split_bill(split_by)?;

        let items = order
            .items()
            .iter()
            .map(|item| {
                let unit_price = item.unit_price();
                let subtotal = item.subtotal();
                BillLine {
                    name: item.menu_item().name.clone(),
                    quantity: item.quantity(),
                    unit_price,
                    subtotal,
                    price_line: format!("{} x {} = {}", item.quantity(), unit_price, subtotal),
                    supplements: item
                        .supplements()
                        .iter()
                        .map(|s| BillSupplement {
                            name: s.name.clone(),
                            price: s.price,
                        })
                        .collect(),
                }
            })
            .collect();

        Ok(Self {
            table_number: order.table().map(|t| t.number()),
            items,
            subtotal: order.sub_total(),
            cover: CoverLine {
                charge: order.cover_charge(),
                guests: order.guests(),
                total: order.total_cover_charge(),
            },
            service: order.service_charge(),
            tip: order.tip(),
            total: order.total(),
            split: (split_by > 1).then_some(SplitLine {
                ways: split_by,
                per_person,
            }),
        })
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table_number {
            Some(number) => writeln!(f, "Table {number}")?,
            None => writeln!(f, "No table")?,
        }
        for line in &self.items {
            writeln!(f, "{:<24} {}", line.name, line.price_line)?;
            for supplement in &line.supplements {
                writeln!(f, "  + {:<20} {}", supplement.name, supplement.price)?;
            }
        }
        writeln!(
            f,
            "Cover ({} x {}): {}",
            self.cover.guests, self.cover.charge, self.cover.total
        )?;
        writeln!(f, "Subtotal: {}", self.subtotal)?;
        writeln!(f, "Service: {}", self.service)?;
        writeln!(f, "Tip: {}", self.tip)?;
        write!(f, "Total: {}", self.total)?;
        if let Some(split) = &self.split {
            write!(f, "\nSplit {} ways: {} each", split.ways, split.per_person)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::menu::MenuItem;
    use crate::table::Table;

    fn sample_order() -> Order {
        let mut table = Table::new(4, 6);
        table.occupy(2).unwrap();
        let mut order = Order::new(
            Some(table),
            2,
            Money::from_cents(200),
            Money::from_cents(300),
            Utc::now(),
        );
        let pasta = order
            .add_order_item(MenuItem::dish("Carbonara", Money::from_cents(1200)), 2, None)
            .unwrap();
        order
            .item_mut(pasta)
            .unwrap()
            .add_supplement("guanciale", Money::from_cents(150))
            .unwrap();
        order.add_tip(Money::from_cents(100)).unwrap();
        order
    }

    #[test]
    fn bill_breakdown_matches_order() {
        let order = sample_order();
        let bill = Bill::for_order(&order, 1).unwrap();

        assert_eq!(bill.table_number, Some(4));
        assert_eq!(bill.items.len(), 1);
        assert_eq!(bill.items[0].unit_price, Money::from_cents(1350));
        assert_eq!(bill.items[0].price_line, "2 x €13.50 = €27.00");
        assert_eq!(bill.items[0].supplements[0].name, "guanciale");
        assert_eq!(bill.cover.total, Money::from_cents(400));
        assert_eq!(bill.subtotal, Money::from_cents(3100));
        assert_eq!(bill.total, Money::from_cents(3500));
        assert_eq!(bill.total, order.total());
        assert!(bill.split.is_none());
    }

    #[test]
    fn split_present_only_when_more_than_one_way() {
        let order = sample_order();

        let bill = Bill::for_order(&order, 2).unwrap();
        assert_eq!(
            bill.split,
            Some(SplitLine {
                ways: 2,
                per_person: Money::from_cents(1750)
            })
        );

        let json = serde_json::to_value(Bill::for_order(&order, 1).unwrap()).unwrap();
        assert!(json.get("split").is_none());
        assert_eq!(json["total"], 3500);
    }

    #[test]
    fn zero_split_is_rejected() {
        let order = sample_order();
        assert!(matches!(
            Bill::for_order(&order, 0),
            Err(OrderError::InvalidSplit { ways: 0 })
        ));
    }

    #[test]
    fn display_renders_totals() {
        let text = Bill::for_order(&sample_order(), 2).unwrap().to_string();
        assert!(text.starts_with("Table 4\n"));
        assert!(text.contains("Total: €35.00"));
        assert!(text.ends_with("Split 2 ways: €17.50 each"));
    }
}
