//! # Error Types
//!
//! Domain-specific error types for farm-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  farm-core errors (this file)                                          │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  farm-db errors (separate crate)                                       │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── ReservationError - Outcome of a failed reservation commit         │
//! │                                                                         │
//! │  HTTP errors (farm-api)                                                │
//! │  └── AppError         - What clients see (JSON body + status)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Client                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ID, field, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A reservation type tag was neither `product` nor `activity`.
    ///
    /// ## When This Occurs
    /// - Client sends `{"type": "vegetable"}` in a reserve request
    /// - A stored row carries an unknown tag (schema drift)
    #[error("invalid reservation type: {0}")]
    InvalidReservationType(String),

    /// Role string was neither `admin` nor `customer`.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// Rank thresholds are inverted or equal.
    ///
    /// ## When This Occurs
    /// Configuration sets `bronze_max >= silver_max`. Rank assignment would be
    /// inconsistent, so this is rejected at load time instead of being
    /// silently reordered.
    #[error("invalid rank thresholds: bronze_max ({bronze_max}) must be below silver_max ({silver_max})")]
    InvalidRankThresholds { bronze_max: i64, silver_max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
