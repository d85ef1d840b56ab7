//! # Rank Calculator
//!
//! Maps a credit balance to a loyalty tier.
//!
//! ## Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  credits:   0 ─────── bronze_max ─────── silver_max ──────────► ∞       │
//! │             │   Bronze    ││     Silver      ││       Gold              │
//! │             └─────────────┘└─────────────────┘└───────────────          │
//! │  Boundaries belong to the LOWER tier:                                   │
//! │    credits == bronze_max → Bronze                                       │
//! │    credits == silver_max → Silver                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator is evaluated every time credits change (account layer) and
//! its stored result is snapshotted into every new reservation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Rank;

/// Computes the rank for `credits` under the given thresholds.
///
/// Pure and total. Thresholds are not checked here; use [`RankThresholds`]
/// to reject inverted configurations up front.
///
/// ## Example
/// ```rust
/// use farm_core::rank::rank;
/// use farm_core::Rank;
///
/// assert_eq!(rank(100, 100, 500), Rank::Bronze);
/// assert_eq!(rank(101, 100, 500), Rank::Silver);
/// assert_eq!(rank(501, 100, 500), Rank::Gold);
/// ```
pub fn rank(credits: i64, bronze_max: i64, silver_max: i64) -> Rank {
    if credits <= bronze_max {
        Rank::Bronze
    } else if credits <= silver_max {
        Rank::Silver
    } else {
        Rank::Gold
    }
}

/// Validated pair of rank thresholds.
///
/// ## Invariant
/// `bronze_max < silver_max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct RankThresholds {
    bronze_max: i64,
    silver_max: i64,
}

#[derive(Deserialize)]
struct RawThresholds {
    bronze_max: i64,
    silver_max: i64,
}

impl TryFrom<RawThresholds> for RankThresholds {
    type Error = CoreError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        RankThresholds::new(raw.bronze_max, raw.silver_max)
    }
}

impl RankThresholds {
    /// Creates thresholds, rejecting inverted or equal values.
    pub fn new(bronze_max: i64, silver_max: i64) -> Result<Self, CoreError> {
        if bronze_max >= silver_max {
            return Err(CoreError::InvalidRankThresholds {
                bronze_max,
                silver_max,
            });
        }
        Ok(RankThresholds {
            bronze_max,
            silver_max,
        })
    }

    #[inline]
    pub const fn bronze_max(&self) -> i64 {
        self.bronze_max
    }

    #[inline]
    pub const fn silver_max(&self) -> i64 {
        self.silver_max
    }

    /// Computes the rank for `credits`.
    #[inline]
    pub fn rank_for(&self, credits: i64) -> Rank {
        rank(credits, self.bronze_max, self.silver_max)
    }
}

impl Default for RankThresholds {
    /// Bronze up to 100 credits, Silver up to 500, Gold above.
    fn default() -> Self {
        RankThresholds {
            bronze_max: 100,
            silver_max: 500,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
