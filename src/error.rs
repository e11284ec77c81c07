// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::store::StoreError;
use crate::validation::Violation;

/// Every way a task request can fail, with one uniform response envelope.
///
/// Storage-specific outcomes ("no row matched", "id did not parse") are
/// folded into these kinds before they leave the accessor, so nothing above
/// it ever inspects a storage error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized(String),

    // 400 Bad Request, carries every violation in rule order
    ValidationFailed {
        message: String,
        violations: Vec<Violation>,
    },

    // 404 Not Found (also used for tasks owned by someone else)
    NotFound(String),

    // 400 Bad Request
    InvalidIdentifier(String),

    // 500 Internal Server Error
    InternalError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg) => msg,
            ApiError::ValidationFailed { message, .. } => message,
            ApiError::NotFound(msg) => msg,
            ApiError::InvalidIdentifier(msg) => msg,
            ApiError::InternalError(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "message": self.message(),
            "code": self.error_code(),
        });

        if let ApiError::ValidationFailed { violations, .. } = self {
            response["errors"] = json!(violations);
        }

        response
    }
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    /// Aggregate a non-empty violation list into one failure, order preserved.
    pub fn validation_failed(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty(), "validation_failed needs at least one violation");
        ApiError::ValidationFailed {
            message: "Validation failed".to_string(),
            violations,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn invalid_identifier() -> Self {
        ApiError::InvalidIdentifier("Invalid task ID format".to_string())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        ApiError::InternalError(message.into())
    }

    /// Log a storage failure and replace it with a generic message.
    pub fn from_store(err: StoreError, message: &str) -> Self {
        tracing::error!("{}: {}", message, err);
        ApiError::internal_error(message)
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
