//! # farm-core: Pure Business Logic for the Farm Share Backend
//!
//! This crate contains the domain model and the rules that do not need I/O:
//! loyalty ranks, item references, and input validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Farm Share Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    farm-api (axum)                              │   │
//! │  │    /signup  /login  /api/reserve  /api/admin/...                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ farm-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   rank    │  │ validation│                  │   │
//! │  │   │  ItemRef  │  │  rank()   │  │  email    │                  │   │
//! │  │   │  Customer │  │ Thresholds│  │  counts   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    farm-db (Database Layer)                     │   │
//! │  │         SQLite, Resource Ledger, Reservation Committer          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Activity, Reservation, ItemRef)
//! - [`rank`] - Credits to loyalty tier mapping
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use farm_core::{ItemRef, ItemKind, RankThresholds, Rank};
//!
//! let thresholds = RankThresholds::new(100, 500).unwrap();
//! assert_eq!(thresholds.rank_for(250), Rank::Silver);
//!
//! let item = ItemRef::parse("product", "bread").unwrap();
//! assert_eq!(item.kind(), ItemKind::Product);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod rank;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use rank::RankThresholds;
pub use types::*;
