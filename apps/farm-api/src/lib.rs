//! # Farm Share API
//!
//! HTTP server for customer accounts, the product/activity catalog and
//! reservations.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Farm Share API                                │
//! │                                                                         │
//! │  Client ───► axum (8080) ───► extractors ───► handlers ───► farm-db     │
//! │               │                (AuthUser,       │            │          │
//! │               │                 RequireAdmin)   │            ▼          │
//! │          TraceLayer                             │         SQLite (WAL)  │
//! │          CatchPanicLayer                        ▼                       │
//! │                                       AppError → JSON {error, code}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! `farm.toml` (or the file named by `FARM_CONFIG`), overridden by
//! `FARM__SECTION__KEY` environment variables. See [`config`].

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod telemetry;

// Re-exports
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use routes::build_app;
pub use state::AppState;
