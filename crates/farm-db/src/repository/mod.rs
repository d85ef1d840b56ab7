//! # Repository Module
//!
//! Database repository implementations for the farm share backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.reservations().commit_reservation(id, "bread", "product")  │
//! │       ▼                                                                 │
//! │  ReservationRepository ──────┐                                          │
//! │  ├── commit / commit_reservation                                        │
//! │  ├── list_all / list_for_customer                                       │
//! │  └── delete                  │ same transaction                         │
//! │                              ▼                                          │
//! │  ledger (claim_one, try_reserve_one) ── products.quantity               │
//! │                                         activities.capacity             │
//! │                                                                         │
//! │  CustomerRepository   accounts, credits + rank                          │
//! │  CatalogRepository    product / activity CRUD                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Accounts
//! - [`CatalogRepository`](catalog::CatalogRepository) - Products and activities
//! - [`LedgerRepository`](ledger::LedgerRepository) - Stock and slot counters
//! - [`ReservationRepository`](reservation::ReservationRepository) - Commit and history

pub mod catalog;
pub mod customer;
pub mod ledger;
pub mod reservation;
