//! # Domain Types
//!
//! Core domain types used throughout the farm share backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │ Product/Activity│   │  Reservation    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id             │   │  id (UUID)      │       │
//! │  │  email (unique) │   │  quantity /     │   │  customer_id    │       │
//! │  │  credits        │   │  capacity       │   │  item: ItemRef  │       │
//! │  │  rank (derived) │   │  visible        │   │  priority_rank  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rank       │   │    ItemRef      │   │ReservationStatus│       │
//! │  │  Bronze         │   │  Product(id)    │   │  Pending (unused│       │
//! │  │  Silver         │   │  Activity(id)   │   │  Confirmed      │       │
//! │  │  Gold           │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A reservation freezes the customer's rank at booking time in
//! `priority_rank`. Later credit changes never rewrite it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// =============================================================================
// Rank
// =============================================================================

/// Loyalty tier derived from a customer's credit balance.
///
/// Variants are declared lowest first, so `Ord` follows tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Bronze,
    Silver,
    Gold,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rank::Bronze => "Bronze",
            Rank::Silver => "Silver",
            Rank::Gold => "Gold",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Role
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "customer" => Ok(Role::Customer),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Item Kind / Item Reference
// =============================================================================

/// The type tag of a reservable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Product,
    Activity,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Product => "product",
            ItemKind::Activity => "activity",
        }
    }

    /// Message used when the item has no units left.
    pub fn exhausted_message(&self) -> &'static str {
        match self {
            ItemKind::Product => "product out of stock",
            ItemKind::Activity => "activity fully booked",
        }
    }
}

impl FromStr for ItemKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(ItemKind::Product),
            "activity" => Ok(ItemKind::Activity),
            other => Err(CoreError::InvalidReservationType(other.to_string())),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polymorphic reference to a reservable item.
///
/// The tag and the id travel together, so an id can never be resolved
/// against the wrong table.
///
/// Serialized as `{"type": "product", "item_id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "item_id", rename_all = "lowercase")]
pub enum ItemRef {
    Product(String),
    Activity(String),
}

impl ItemRef {
    /// Builds a reference from an already-parsed kind.
    pub fn new(kind: ItemKind, id: impl Into<String>) -> Self {
        match kind {
            ItemKind::Product => ItemRef::Product(id.into()),
            ItemKind::Activity => ItemRef::Activity(id.into()),
        }
    }

    /// Builds a reference from an untyped tag, as received at the API edge.
    ///
    /// ## Errors
    /// `CoreError::InvalidReservationType` when the tag is unknown.
    pub fn parse(kind: &str, id: impl Into<String>) -> Result<Self, CoreError> {
        Ok(ItemRef::new(kind.parse()?, id))
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemRef::Product(_) => ItemKind::Product,
            ItemRef::Activity(_) => ItemKind::Activity,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ItemRef::Product(id) | ItemRef::Activity(id) => id,
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.id())
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered account.
///
/// `rank` is always `rank::rank(credits, ..)` for the configured thresholds.
/// It is never written on its own; see `CustomerRepository::update_credits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login email, unique across accounts.
    pub email: String,

    /// PHC-formatted Argon2id hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Per-account random salt. Never serialized.
    #[serde(skip_serializing, default)]
    pub salt: String,

    /// Display name.
    pub name: String,

    /// Credit balance (>= 0).
    pub credits: i64,

    /// Loyalty tier derived from `credits`.
    pub rank: Rank,

    pub role: Role,

    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Product / Activity
// =============================================================================

/// A product with finite stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,

    /// Remaining stock. Reaches 0, never negative.
    pub quantity: i64,

    /// Whether customers can see it in the catalog.
    pub visible: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An activity with a finite number of slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,

    /// Remaining slots. Reaches 0, never negative.
    pub capacity: i64,

    pub visible: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Reservation
// =============================================================================

/// Status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Reserved for a future waitlist flow. The commit path never writes it.
    Pending,
    /// Stock was taken and the reservation recorded.
    Confirmed,
}

/// A committed reservation of one unit of one item.
///
/// Created exactly once by the committer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub customer_id: String,

    /// What was reserved (tag + id).
    #[serde(flatten)]
    pub item: ItemRef,

    /// Customer rank at booking time (frozen).
    pub priority_rank: Rank,

    pub timestamp: DateTime<Utc>,
    pub status: ReservationStatus,
}

// =============================================================================
// Unit Tests
// =============================================================================
