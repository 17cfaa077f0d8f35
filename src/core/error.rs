//! Error type system for the Liftlog backend
//!
//! One crate-wide error enum with:
//! - The outcome taxonomy surfaced by account lifecycle operations
//!   (validation, conflict, authentication, not-found)
//! - Opaque internal failures (database, pool, IO) that render as 500s
//! - HTTP status code mapping and JSON error responses with trace IDs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Main error type for the Liftlog backend
#[derive(Debug, thiserror::Error)]
pub enum LiftlogError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    // Account lifecycle outcomes
    #[error("Invalid request: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Internal failures
    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task error: {0}")]
    TaskError(String),
}

impl LiftlogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LiftlogError::ValidationError(_) => StatusCode::BAD_REQUEST,

            LiftlogError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,

            LiftlogError::NotFound(_) => StatusCode::NOT_FOUND,

            LiftlogError::Conflict(_) => StatusCode::CONFLICT,

            LiftlogError::InitializationError(_)
            | LiftlogError::ConfigError(_)
            | LiftlogError::DatabaseError(_)
            | LiftlogError::PoolError(_)
            | LiftlogError::HashingError(_)
            | LiftlogError::IoError(_)
            | LiftlogError::TaskError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            LiftlogError::InitializationError(_) => "InitializationError",
            LiftlogError::ConfigError(_) => "ConfigError",
            LiftlogError::DatabaseError(_) => "DatabaseError",
            LiftlogError::PoolError(_) => "PoolError",
            LiftlogError::ValidationError(_) => "ValidationError",
            LiftlogError::Conflict(_) => "Conflict",
            LiftlogError::AuthenticationError(_) => "AuthenticationError",
            LiftlogError::NotFound(_) => "NotFound",
            LiftlogError::HashingError(_) => "HashingError",
            LiftlogError::IoError(_) => "IoError",
            LiftlogError::TaskError(_) => "TaskError",
        }
    }

    /// Whether this error exposes internal state rather than a client outcome
    pub fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from a LiftlogError
    pub fn from_error(error: &LiftlogError) -> Self {
        // Internal failures render with a generic message so collaborator
        // details never reach the client
        let message = if error.is_internal() {
            "Internal server error".to_string()
        } else {
            error.to_string()
        };
        Self::new(error.error_type().to_string(), message)
    }
}

/// Implement IntoResponse for LiftlogError to enable automatic error handling in Axum
impl IntoResponse for LiftlogError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        tracing::error!(
            error_type = self.error_type(),
            trace_id = %error_response.trace_id,
            status_code = %status_code,
            "Request failed: {}",
            self
        );

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with LiftlogError
pub type Result<T> = std::result::Result<T, LiftlogError>;
