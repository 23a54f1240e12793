//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ErrorKind};

/// API-level error type that maps to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request from the client, detected before reaching the domain.
    #[error("{0}")]
    BadRequest(String),

    /// Domain logic error.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation
                | ErrorKind::CapacityExceeded
                | ErrorKind::InvalidTransition => StatusCode::BAD_REQUEST,
                ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn validation_details(&self) -> Option<&domain::ValidationErrors> {
        match self {
            ApiError::Domain(err) => err.validation_errors(),
            ApiError::BadRequest(_) => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "internal server error");
        }

        let mut body = serde_json::json!({ "error": self.to_string() });
        if let Some(details) = self.validation_details() {
            body["details"] = serde_json::json!(details);
        }
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use domain::{OrderError, OrderState, StoreResultExt, TableError, ValidationErrors};
    use store::StoreError;

    use super::*;

    fn backend_failure() -> DomainError {
        let result: Result<(), StoreError> = Err(StoreError::Backend {
            record_type: "Order",
            message: "unavailable".to_string(),
        });
        result.context("saving order").unwrap_err()
    }

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(DomainError::not_found("Order", "x"));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let capacity = ApiError::from(DomainError::from(TableError::CapacityExceeded {
            table_number: 1,
            capacity: 2,
            requested: 3,
        }));
        assert_eq!(capacity.status(), StatusCode::BAD_REQUEST);

        let transition = ApiError::from(DomainError::from(OrderError::InvalidTransition {
            from: OrderState::Ready,
            to: OrderState::Served,
        }));
        assert_eq!(transition.status(), StatusCode::BAD_REQUEST);

        let validation =
            ApiError::from(DomainError::from(ValidationErrors::single("guests", "bad")));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let internal = ApiError::from(backend_failure());
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request_message() {
        let err = ApiError::BadRequest("Invalid ID format".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid ID format");
    }
}
