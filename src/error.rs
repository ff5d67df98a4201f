//! Application error type and its HTTP representation.
//!
//! Every layer returns [`AppError`]. Handlers turn it into a JSON body of the form
//! `{"error": {"code": ..., "message": ..., "details": ...}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::utils::short_code::CodecError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input: empty or non-http(s) URL, unusable custom alias, bad request body.
    #[error("{message}")]
    Validation { message: String, details: Value },
    /// A short code the codec rejects.
    #[error("{message}")]
    InvalidCode { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    /// A custom alias already claimed by a different URL, or a uniqueness race.
    #[error("{message}")]
    Conflict { message: String, details: Value },
    /// Persistence failure. The message never carries the raw database error.
    ///
    /// `transient` is set only when the statement never reached the database.
    #[error("{message}")]
    Store {
        message: String,
        details: Value,
        transient: bool,
    },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_code(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidCode {
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
    pub fn store(message: impl Into<String>, details: Value) -> Self {
        Self::Store {
            message: message.into(),
            details,
            transient: false,
        }
    }
    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Store {
            message: message.into(),
            details,
            transient: true,
        }
    }

    /// True when retrying cannot apply a write twice.
    ///
    /// A failure after the statement was sent may follow a commit, so only store errors
    /// raised before any statement ran qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store { transient: true, .. })
    }

    /// Splits the error into its HTTP status and body payload.
    pub fn to_error_info(&self) -> (StatusCode, ErrorInfo) {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::InvalidCode { message, details } => {
                (StatusCode::BAD_REQUEST, "invalid_code", message, details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Conflict { message, details } => {
                (StatusCode::BAD_REQUEST, "conflict", message, details)
            }
            AppError::Store { message, details, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                message,
                details,
            ),
        };

        (
            status,
            ErrorInfo {
                code,
                message: message.clone(),
                details: details.clone(),
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.to_error_info();

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<CodecError> for AppError {
    fn from(e: CodecError) -> Self {
        AppError::invalid_code("Invalid short code", json!({ "reason": e.to_string() }))
    }
}

/// Maps a database error to an [`AppError`].
///
/// Unique violations become [`AppError::Conflict`] naming the constraint; anything
/// else is logged here and reported as a generic [`AppError::Store`]. A pool timeout
/// is the one transient case: no connection was handed out, so nothing was executed.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    if matches!(e, sqlx::Error::PoolTimedOut) {
        tracing::warn!(error = %e, "Database unavailable");
        return AppError::store_unavailable("Database unavailable", json!({}));
    }

    tracing::error!(error = %e, "Database error");
    AppError::store("Database error", json!({}))
}
