//! Domain error types.

use store::StoreError;
use thiserror::Error;

use crate::order::{OrderError, OrderItemError};
use crate::table::TableError;
use crate::validation::ValidationErrors;

/// Coarse classification of a [`DomainError`], used by callers to pick a
/// response without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    CapacityExceeded,
    InvalidTransition,
    Infrastructure,
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// One or more input fields were rejected.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    OrderItem(#[from] OrderItemError),

    /// The store failed for a reason other than a missing record.
    #[error("{context}: {source}")]
    Infrastructure {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Table(TableError::CapacityExceeded { .. }) => ErrorKind::CapacityExceeded,
            DomainError::Table(
                TableError::NoGuests { .. }
                | TableError::InUse { .. }
                | TableError::CapacityBelowGuests { .. },
            ) => {
                ErrorKind::Validation
            }
            DomainError::Order(OrderError::InvalidTransition { .. }) => {
                ErrorKind::InvalidTransition
            }
            DomainError::Order(OrderError::ItemNotFound { .. }) => ErrorKind::NotFound,
            DomainError::Order(
                OrderError::ItemsLocked { .. }
                | OrderError::Closed { .. }
                | OrderError::InvalidQuantity { .. }
                | OrderError::NegativeAmount { .. }
                | OrderError::InvalidSplit { .. },
            ) => ErrorKind::Validation,
            DomainError::OrderItem(
                OrderItemError::SupplementNotFound { .. } | OrderItemError::NoteNotFound { .. },
            ) => ErrorKind::NotFound,
            DomainError::OrderItem(OrderItemError::NegativePrice { .. }) => ErrorKind::Validation,
            DomainError::Infrastructure { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Field errors carried by a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            DomainError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { record_type, id } => DomainError::NotFound {
                entity: record_type,
                id,
            },
            other => DomainError::Infrastructure {
                context: "store operation failed".to_string(),
                source: other,
            },
        }
    }
}

/// Adds context to store failures. Missing records stay `NotFound`.
pub trait StoreResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T, DomainError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn context(self, context: impl Into<String>) -> Result<T, DomainError> {
        self.map_err(|e| match e {
            StoreError::NotFound { record_type, id } => DomainError::NotFound {
                entity: record_type,
                id,
            },
            other => DomainError::Infrastructure {
                context: context.into(),
                source: other,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderState;

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: DomainError = StoreError::not_found("Table", "42").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Table not found: 42");
    }

    #[test]
    fn test_backend_failure_keeps_context() {
        let result: Result<(), StoreError> = Err(StoreError::Backend {
            record_type: "Order",
            message: "disk full".to_string(),
        });
        let err = result.context("saving order").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert!(err.to_string().starts_with("saving order: "));
    }

    #[test]
    fn test_kinds() {
        let capacity: DomainError = TableError::CapacityExceeded {
            table_number: 1,
            capacity: 4,
            requested: 6,
        }
        .into();
        assert_eq!(capacity.kind(), ErrorKind::CapacityExceeded);

        let transition: DomainError = OrderError::InvalidTransition {
            from: OrderState::Served,
            to: OrderState::New,
        }
        .into();
        assert_eq!(transition.kind(), ErrorKind::InvalidTransition);

        let split: DomainError = OrderError::InvalidSplit { ways: 0 }.into();
        assert_eq!(split.kind(), ErrorKind::Validation);

        let note: DomainError = OrderItemError::NoteNotFound {
            message: "x".to_string(),
        }
        .into();
        assert_eq!(note.kind(), ErrorKind::NotFound);
    }
}
