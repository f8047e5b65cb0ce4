//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow                                           │
//! │                                                                         │
//! │  Handler                                                                │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ├── ValidationError  ── 400 ──┐                                 │
//! │         ├── Unauthenticated  ── 401 ──┤                                 │
//! │         ├── Forbidden        ── 403 ──┤                                 │
//! │         ├── NotFound         ── 404 ──┼──► { "error": …, "code": … }    │
//! │         ├── InsufficientStock── 409 ──┤                                 │
//! │         ├── Busy (retryable) ── 503 ──┤                                 │
//! │         └── Internal         ── 500 ──┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Authentication failures stay generic (one message for "unknown user"
//! and "wrong password"); storage internals are logged server-side and
//! never included in the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use almacen_core::{CoreError, ValidationError};
use almacen_db::{DbError, LedgerError};

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// ```json
/// { "error": "Insufficient stock for AZ-01: available 3, requested 5",
///   "code": "INSUFFICIENT_STOCK" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// No valid session (401)
    Unauthenticated,

    /// Valid session, insufficient permissions (403)
    Forbidden,

    /// Resource not found (404)
    NotFound,

    /// Insufficient stock at commit time (409)
    InsufficientStock,

    /// Transient failure, retry may succeed (503)
    Retryable,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::Retryable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Generic authentication failure. One message for every cause, so
    /// callers can't probe which usernames exist.
    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "Usuario o contraseña incorrectos")
    }

    /// No session on a protected route.
    pub fn unauthenticated() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "No autenticado")
    }

    /// Authenticated but not allowed.
    pub fn forbidden() -> Self {
        ApiError::new(ErrorCode::Forbidden, "No autorizado")
    }

    /// Creates an internal error with a generic client message.
    pub fn internal() -> Self {
        ApiError::new(ErrorCode::Internal, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = Json(json!({
            "error": self.message,
            "code": self.code,
        }));
        (status, body).into_response()
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::PriceNotPositive { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field } => {
                ApiError::validation(format!("Duplicate {}: already exists", field))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::Busy(e) => {
                tracing::warn!("Database busy: {}", e);
                ApiError::new(
                    ErrorCode::Retryable,
                    "Could not complete the operation, try again",
                )
            }
            DbError::PoolExhausted => {
                tracing::warn!("Connection pool exhausted");
                ApiError::new(
                    ErrorCode::Retryable,
                    "Could not complete the operation, try again",
                )
            }
            other => {
                // Log the actual error but return a generic message.
                tracing::error!("Database error: {}", other);
                ApiError::internal()
            }
        }
    }
}

/// Converts engine errors to API errors.
impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Core(e) => e.into(),
            LedgerError::Db(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::InsufficientStock.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::Retryable.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_insufficient_stock_maps_to_conflict() {
        let err: ApiError = CoreError::InsufficientStock {
            code: "AZ-01".into(),
            available: 1.0,
            requested: 2.0,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("AZ-01"));
    }

    #[test]
    fn test_busy_maps_to_retryable() {
        let err: ApiError = DbError::Busy("database is locked".into()).into();
        assert_eq!(err.code, ErrorCode::Retryable);
        // The client message never carries the internal error text.
        assert!(!err.message.contains("locked"));
    }
}
