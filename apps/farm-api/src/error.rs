//! Error types for the HTTP layer.
//!
//! Every handler returns [`AppResult`]. [`AppError`] turns domain, storage
//! and reservation failures into a status code plus a JSON body:
//!
//! ```text
//! { "error": "product out of stock", "code": "RESOURCE_EXHAUSTED" }
//! ```
//!
//! Storage failures are logged with their cause and answered with a
//! generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use farm_core::{CoreError, ValidationError};
use farm_db::{DbError, ReservationError};

/// Application-level error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `farm_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from `farm_db`.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A rejected or failed reservation commit.
    #[error(transparent)]
    Reservation(#[from] ReservationError),

    /// Missing, malformed or expired credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// An internal error. The message is logged, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Core(CoreError::Validation(err))
    }
}

impl AppError {
    /// Status code, machine-readable code and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::Validation(err) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                }
                CoreError::InvalidReservationType(_) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_RESERVATION_TYPE",
                    core.to_string(),
                ),
                CoreError::InvalidRole(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_ROLE", core.to_string())
                }
                CoreError::InvalidRankThresholds { .. } => internal(core),
            },

            AppError::Db(db) => classify_db_error(db),

            AppError::Reservation(err) => match err {
                ReservationError::CustomerNotFound => {
                    (StatusCode::NOT_FOUND, "CUSTOMER_NOT_FOUND", err.to_string())
                }
                ReservationError::ItemNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND", err.to_string())
                }
                ReservationError::ResourceExhausted { .. } => {
                    (StatusCode::CONFLICT, "RESOURCE_EXHAUSTED", err.to_string())
                }
                ReservationError::InvalidReservationType(_) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_RESERVATION_TYPE",
                    err.to_string(),
                ),
                ReservationError::Persistence(db) => internal(db),
            },

            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Internal(msg) => internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a storage error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - Unique constraint violations map to 409.
/// - Foreign key violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, String) {
    match err {
        DbError::NotFound { entity, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{} not found", entity.to_lowercase()),
        ),
        DbError::UniqueViolation { .. } => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        DbError::ForeignKeyViolation { .. } => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "Referenced record does not exist".to_string(),
        ),
        other => internal(other),
    }
}

fn internal(cause: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %cause, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
