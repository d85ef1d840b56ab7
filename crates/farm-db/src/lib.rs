//! # farm-db: Database Layer for the Farm Share Backend
//!
//! SQLite persistence via sqlx, including the two pieces that carry the
//! system's correctness guarantees: the Resource Ledger and the
//! Reservation Committer.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Farm Share Data Flow                             │
//! │                                                                         │
//! │  POST /api/reserve                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     farm-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ Customer       │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Catalog        │    │ 001_initial  │  │   │
//! │  │   │ WAL + busy    │    │ Ledger         │    │   _schema    │  │   │
//! │  │   │ timeout       │    │ Reservation    │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (farm.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and reservation error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use farm_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("farm.db")).await?;
//!
//! let reservation = db
//!     .reservations()
//!     .commit_reservation(&customer_id, "bread", "product")
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ReservationError};
pub use pool::{Database, DbConfig};

pub use repository::catalog::{CatalogRepository, ItemDraft};
pub use repository::customer::{CustomerRepository, NewCustomer};
pub use repository::ledger::LedgerRepository;
pub use repository::reservation::ReservationRepository;
