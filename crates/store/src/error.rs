use thiserror::Error;

/// Errors that can occur when interacting with a repository.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given id exists.
    #[error("{record_type} not found: {id}")]
    NotFound {
        record_type: &'static str,
        id: String,
    },

    /// The backend rejected or failed the operation.
    #[error("Backend error on {record_type}: {message}")]
    Backend {
        record_type: &'static str,
        message: String,
    },
}

impl StoreError {
    /// Builds a `NotFound` error for a record type and id.
    pub fn not_found(record_type: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            record_type,
            id: id.to_string(),
        }
    }

    /// Returns true if this error means the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StoreError>;
