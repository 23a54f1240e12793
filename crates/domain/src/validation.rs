//! Field-level input validation.
//!
//! Validation collects every failing field instead of stopping at the
//! first one, so a caller can report all problems in one response.

use std::fmt;

use serde::Serialize;

use crate::order::Money;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// A collection of rejected fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection holding one error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns `Ok(())` if nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Checks `min <= value <= max`.
    pub fn check_range(&mut self, field: &str, value: u32, min: u32, max: u32) {
        if value < min || value > max {
            self.add(field, format!("must be between {min} and {max}"));
        }
    }

    /// Checks that an amount lies in `0..=max`.
    pub fn check_amount(&mut self, field: &str, value: Money, max: Money) {
        if value.is_negative() || value > max {
            self.add(field, format!("must be between {} and {}", Money::zero(), max));
        }
    }

    /// Checks the character count of a trimmed string.
    pub fn check_length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.trim().chars().count();
        if len < min || len > max {
            self.add(
                field,
                format!("must be between {min} and {max} characters long"),
            );
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Bounds applied to incoming fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_table_capacity: u32,
    pub max_guests: u32,
    pub max_item_quantity: u32,
    /// Upper bound for cover charge, service charge and each tip.
    pub max_charge: Money,
    pub max_supplement_price: Money,
    pub max_menu_price: Money,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_table_capacity: 12,
            max_guests: 12,
            max_item_quantity: 10,
            max_charge: Money::from_cents(9_999),
            max_supplement_price: Money::from_euros(99),
            max_menu_price: Money::from_euros(9_999),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failure() {
        let mut errors = ValidationErrors::new();
        errors.check_range("guests", 0, 1, 12);
        errors.check_amount("tip", Money::from_cents(-5), Money::from_cents(9_999));
        errors.check_length("customization", "x", 2, 300);
        errors.check_range("capacity", 4, 1, 12);

        assert_eq!(errors.errors().len(), 3);
        assert_eq!(errors.errors()[0].field, "guests");
        assert_eq!(errors.errors()[0].message, "must be between 1 and 12");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn empty_collection_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn display_joins_fields() {
        let mut errors = ValidationErrors::single("guests", "must be between 1 and 12");
        errors.add("state", "is unknown");
        assert_eq!(
            errors.to_string(),
            "guests must be between 1 and 12; state is unknown"
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        errors.check_length("name", "caffè", 2, 5);
        assert!(errors.is_empty());
    }

    #[test]
    fn serializes_as_list() {
        let errors = ValidationErrors::single("guests", "too many");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "guests");
    }
}
