//! Application error type shared by the store, the engine and the HTTP layer.
//!
//! Input problems render as `422 {"error":"Invalid input"}` and unknown codes
//! as an empty `404`. Everything else is a server-side fault and renders with
//! the structured body `{"error":{"code","message","details"}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Fixed body returned for every rejected input.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable description of a server-side failure.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed code or unacceptable long URL.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unknown code or unroutable request.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Storage-layer uniqueness violation.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Every candidate code collided within the attempt budget.
    #[error("Failed to generate a unique code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    /// Insert reported success but the record could not be read back.
    #[error("{message}")]
    Consistency { message: String, details: Value },

    /// The store could not be reached.
    #[error("{message}")]
    Unavailable { message: String, details: Value },

    /// A store call did not finish within the configured timeout.
    #[error("Store operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn consistency(message: impl Into<String>, details: Value) -> Self {
        Self::Consistency {
            message: message.into(),
            details,
        }
    }

    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error renders with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::GenerationExhausted { .. }
            | Self::Consistency { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures that indicate a fault in the service or its store
    /// rather than a problem with the caller's input.
    pub fn is_fatal(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Converts the error into its serializable description.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, details) = match self {
            Self::Validation { details, .. } => ("validation_error", details.clone()),
            Self::NotFound { details, .. } => ("not_found", details.clone()),
            Self::Conflict { details, .. } => ("conflict", details.clone()),
            Self::GenerationExhausted { attempts } => {
                ("generation_exhausted", json!({ "attempts": attempts }))
            }
            Self::Consistency { details, .. } => ("consistency_failure", details.clone()),
            Self::Unavailable { details, .. } => ("store_unavailable", details.clone()),
            Self::Timeout {
                operation,
                timeout_ms,
            } => (
                "store_timeout",
                json!({ "operation": operation, "timeout_ms": timeout_ms }),
            ),
            Self::Internal { details, .. } => ("internal_error", details.clone()),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            AppError::Validation { .. } => {
                (status, Json(json!({ "error": INVALID_INPUT_MESSAGE }))).into_response()
            }
            AppError::NotFound { .. } => status.into_response(),
            other => {
                let body = ErrorBody {
                    error: other.to_error_info(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::unavailable("Database unavailable", json!({ "reason": e.to_string() }))
            }
            _ => AppError::internal("Database error", json!({ "reason": e.to_string() })),
        }
    }
}
