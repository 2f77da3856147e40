//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is a structured JSON payload
//! with an `error` message and, for batch validation failures, a `details`
//! array the caller can act on.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::accounts::AccountError;
use crate::services::addresses::AddressError;
use crate::services::orders::OrderError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Order creation or mutation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Address save failed.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Account operation failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message describing what was invalid.
    pub error: String,
    /// Offending identifiers or field names for batch validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Repository(e) => repository_is_server_error(e),
            Self::Order(OrderError::Repository(e)) => repository_is_server_error(e),
            Self::Address(AddressError::Repository(e)) => repository_is_server_error(e),
            Self::Account(AccountError::Repository(e)) => repository_is_server_error(e),
            Self::Internal(_) => true,
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Repository(e)
            | Self::Order(OrderError::Repository(e))
            | Self::Address(AddressError::Repository(e))
            | Self::Account(AccountError::Repository(e)) => repository_status(e),
            Self::Order(e) => order_status(e),
            Self::Address(
                AddressError::AddressNotFound
                | AddressError::AccountNotFound
                | AddressError::StoreNotFound,
            ) => StatusCode::NOT_FOUND,
            Self::Address(_) => StatusCode::BAD_REQUEST,
            Self::Account(AccountError::AccountNotFound) => StatusCode::NOT_FOUND,
            Self::Account(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        // Don't expose internal error details to clients
        if self.is_server_error() {
            return ErrorBody {
                error: "Internal server error".to_owned(),
                details: Vec::new(),
            };
        }

        let details = match self {
            Self::Order(OrderError::ProductsNotFound(uuids)) => {
                uuids.iter().map(ToString::to_string).collect()
            }
            Self::Order(OrderError::MissingAddressFields(fields)) => {
                fields.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        };

        ErrorBody {
            error: self.to_string(),
            details,
        }
    }
}

fn repository_is_server_error(e: &RepositoryError) -> bool {
    matches!(
        e,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
    )
}

fn repository_status(e: &RepositoryError) -> StatusCode {
    match e {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn order_status(e: &OrderError) -> StatusCode {
    match e {
        OrderError::StoreNotFound | OrderError::AccountNotFound | OrderError::OrderNotFound => {
            StatusCode::NOT_FOUND
        }
        OrderError::Cart(_)
        | OrderError::ProductsNotFound(_)
        | OrderError::MissingAddressFields(_)
        | OrderError::InvalidAddress(_)
        | OrderError::BelowMinimum { .. }
        | OrderError::InvalidStatusTransition { .. } => StatusCode::BAD_REQUEST,
        OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(self.body())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("store abc".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_status() {
        let response = AppError::Validation("bad input".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_products_reports_every_uuid() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let err = AppError::Order(OrderError::ProductsNotFound(vec![a, b]));
        let body = err.body();
        assert_eq!(body.details, vec![a.to_string(), b.to_string()]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_status() {
        let err = AppError::Repository(RepositoryError::Conflict("duplicate cpf".to_owned()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_hides_details() {
        let err = AppError::Internal("secret".to_owned());
        let body = err.body();
        assert_eq!(body.error, "Internal server error");
    }

    #[test]
    fn test_error_body_omits_empty_details() {
        let body = ErrorBody {
            error: "bad request".to_owned(),
            details: Vec::new(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"bad request"}"#);
    }
}
