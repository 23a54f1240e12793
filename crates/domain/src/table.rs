//! Dining tables and their occupancy.

use common::TableId;
use serde::{Deserialize, Serialize};
use store::Record;
use thiserror::Error;

/// Errors raised by table occupancy rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The table is occupied or too small for the requested party.
    #[error("Table {table_number} cannot seat {requested} guests (max {capacity} seats)")]
    CapacityExceeded {
        table_number: u32,
        capacity: u32,
        requested: u32,
    },

    /// Occupying a table requires at least one guest.
    #[error("Table {table_number} cannot be occupied by zero guests")]
    NoGuests { table_number: u32 },

    /// The table is still referenced by an open order.
    #[error("Table {table_number} is in use by an open order")]
    InUse { table_number: u32 },

    /// The new capacity is smaller than the party currently seated.
    #[error("Table {table_number} seats {guests} guests and cannot shrink to {capacity} seats")]
    CapacityBelowGuests {
        table_number: u32,
        capacity: u32,
        guests: u32,
    },
}

/// A seatable dining table.
///
/// `is_occupied` and `current_guests` always change together, so
/// `is_occupied == (current_guests > 0)` holds for every table reachable
/// through the public API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    id: TableId,
    number: u32,
    capacity: u32,
    is_occupied: bool,
    current_guests: u32,
}

impl Table {
    /// Creates a free table.
    pub fn new(number: u32, capacity: u32) -> Self {
        Self {
            id: TableId::new(),
            number,
            capacity,
            is_occupied: false,
            current_guests: 0,
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn is_occupied(&self) -> bool {
        self.is_occupied
    }

    pub fn current_guests(&self) -> u32 {
        self.current_guests
    }

    /// Returns true if the table is free and can seat `guests` more people.
    pub fn has_capacity(&self, guests: u32) -> bool {
        !self.is_occupied && self.current_guests + guests <= self.capacity
    }

    /// Seats a party at the table.
    ///
    /// The guest count replaces the current one; since only a free table
    /// has capacity, the table is always empty beforehand.
    pub fn occupy(&mut self, guests: u32) -> Result<(), TableError> {
        if guests == 0 {
            return Err(TableError::NoGuests {
                table_number: self.number,
            });
        }
        if !self.has_capacity(guests) {
            return Err(self.capacity_exceeded(guests));
        }

        self.is_occupied = true;
        self.current_guests = guests;
        Ok(())
    }

    /// Changes the size of the party already seated here.
    pub fn reseat(&mut self, guests: u32) -> Result<(), TableError> {
        if guests == 0 {
            return Err(TableError::NoGuests {
                table_number: self.number,
            });
        }
        if guests > self.capacity {
            return Err(self.capacity_exceeded(guests));
        }

        self.is_occupied = true;
        self.current_guests = guests;
        Ok(())
    }

    pub fn renumber(&mut self, number: u32) {
        self.number = number;
    }

    /// Changes the seat count. It can't drop below the seated party.
    pub fn resize(&mut self, capacity: u32) -> Result<(), TableError> {
        if capacity < self.current_guests {
            return Err(TableError::CapacityBelowGuests {
                table_number: self.number,
                capacity,
                guests: self.current_guests,
            });
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Frees the table. Freeing a free table is a no-op.
    pub fn free(&mut self) {
        self.is_occupied = false;
        self.current_guests = 0;
    }

    /// Builds the error reported when `guests` cannot be seated here.
    pub fn capacity_exceeded(&self, guests: u32) -> TableError {
        TableError::CapacityExceeded {
            table_number: self.number,
            capacity: self.capacity,
            requested: guests,
        }
    }
}

impl Record for Table {
    type Id = TableId;

    fn record_type() -> &'static str {
        "Table"
    }

    fn id(&self) -> TableId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_free() {
        let table = Table::new(1, 4);
        assert!(!table.is_occupied());
        assert_eq!(table.current_guests(), 0);
        assert!(table.has_capacity(4));
        assert!(!table.has_capacity(5));
    }

    #[test]
    fn occupy_sets_guests_and_flag() {
        let mut table = Table::new(1, 4);
        table.occupy(3).unwrap();
        assert!(table.is_occupied());
        assert_eq!(table.current_guests(), 3);
    }

    #[test]
    fn full_table_has_no_capacity() {
        let mut table = Table::new(7, 4);
        table.occupy(4).unwrap();
        assert!(!table.has_capacity(1));
    }

    #[test]
    fn occupied_table_rejects_second_party() {
        let mut table = Table::new(2, 6);
        table.occupy(2).unwrap();

        let err = table.occupy(2).unwrap_err();
        assert_eq!(
            err,
            TableError::CapacityExceeded {
                table_number: 2,
                capacity: 6,
                requested: 2
            }
        );
        assert_eq!(table.current_guests(), 2);
    }

    #[test]
    fn occupy_over_capacity_fails_and_leaves_table_free() {
        let mut table = Table::new(3, 4);
        let err = table.occupy(5).unwrap_err();
        assert!(err.to_string().contains("max 4 seats"));
        assert!(!table.is_occupied());
        assert_eq!(table.current_guests(), 0);
    }

    #[test]
    fn occupy_with_zero_guests_fails() {
        let mut table = Table::new(3, 4);
        assert!(matches!(table.occupy(0), Err(TableError::NoGuests { .. })));
        assert!(!table.is_occupied());
    }

    #[test]
    fn free_is_idempotent() {
        let mut table = Table::new(1, 4);
        table.occupy(2).unwrap();

        table.free();
        let once = table.clone();
        table.free();

        assert_eq!(table, once);
        assert!(!table.is_occupied());
        assert_eq!(table.current_guests(), 0);
    }

    #[test]
    fn reseat_changes_party_within_capacity() {
        let mut table = Table::new(4, 4);
        table.occupy(2).unwrap();

        table.reseat(4).unwrap();
        assert_eq!(table.current_guests(), 4);

        assert!(matches!(
            table.reseat(5),
            Err(TableError::CapacityExceeded { requested: 5, .. })
        ));
        assert!(matches!(table.reseat(0), Err(TableError::NoGuests { .. })));
        assert_eq!(table.current_guests(), 4);
    }

    #[test]
    fn resize_keeps_room_for_seated_guests() {
        let mut table = Table::new(6, 6);
        table.occupy(5).unwrap();

        let err = table.resize(4).unwrap_err();
        assert_eq!(
            err,
            TableError::CapacityBelowGuests {
                table_number: 6,
                capacity: 4,
                guests: 5
            }
        );
        assert_eq!(table.capacity(), 6);

        table.resize(8).unwrap();
        assert_eq!(table.capacity(), 8);
    }

    #[test]
    fn freed_table_can_be_occupied_again() {
        let mut table = Table::new(1, 4);
        table.occupy(4).unwrap();
        table.free();
        table.occupy(1).unwrap();
        assert_eq!(table.current_guests(), 1);
    }
}
