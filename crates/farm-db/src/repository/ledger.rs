//! # Resource Ledger
//!
//! Stock (products) and slot (activities) counters with an atomic
//! check-and-decrement.
//!
//! ## Decrement Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Check-and-Decrement                                  │
//! │                                                                         │
//! │  ❌ WRONG: read, then write from application code                      │
//! │     SELECT quantity FROM products WHERE id = ?    -- sees 1            │
//! │     UPDATE products SET quantity = 0 WHERE id = ? -- two callers both  │
//! │                                                  -- "won" the last one │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional statement                                  │
//! │     UPDATE products SET quantity = quantity - 1                        │
//! │     WHERE id = ? AND quantity > 0                                      │
//! │                                                                         │
//! │     rows_affected == 1 → unit claimed                                  │
//! │     rows_affected == 0 → missing row OR count already 0               │
//! │                          (a follow-up read tells which)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lock Ordering
//! The decrement is the first statement of the caller's transaction, so the
//! transaction starts as a writer and takes SQLite's write lock before it
//! reads anything. Concurrent claims queue on that lock (bounded by the
//! busy timeout) and each one sees the previous commit.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult, ReservationError};
use farm_core::{ItemKind, ItemRef};

/// Table and counter column holding the count for an item kind.
pub(crate) fn counter_for(kind: ItemKind) -> (&'static str, &'static str) {
    match kind {
        ItemKind::Product => ("products", "quantity"),
        ItemKind::Activity => ("activities", "capacity"),
    }
}

// =============================================================================
// Transaction-scoped primitives
// =============================================================================

/// Takes one unit of `item` if any remain.
///
/// Returns `false` when nothing was decremented, either because the row is
/// missing or because the count is already zero.
pub(crate) async fn claim_one(conn: &mut SqliteConnection, item: &ItemRef) -> DbResult<bool> {
    let (table, column) = counter_for(item.kind());
    let sql = format!(
        "UPDATE {table} SET {column} = {column} - 1, updated_at = ?1 WHERE id = ?2 AND {column} > 0"
    );

    let result = sqlx::query(&sql)
        .bind(Utc::now())
        .bind(item.id())
        .execute(&mut *conn)
        .await?;

    let claimed = result.rows_affected() == 1;
    debug!(item = %item, claimed, "Ledger claim");
    Ok(claimed)
}

/// Reads the current count of `item`, `None` if the row does not exist.
pub(crate) async fn count_of(conn: &mut SqliteConnection, item: &ItemRef) -> DbResult<Option<i64>> {
    let (table, column) = counter_for(item.kind());
    let sql = format!("SELECT {column} FROM {table} WHERE id = ?1");

    let count = sqlx::query_scalar::<_, i64>(&sql)
        .bind(item.id())
        .fetch_optional(&mut *conn)
        .await?;

    Ok(count)
}

/// Explains a failed claim: the item is either missing or exhausted.
pub(crate) async fn claim_failure(conn: &mut SqliteConnection, item: &ItemRef) -> ReservationError {
    let kind = item.kind();
    let id = item.id().to_string();

    match count_of(conn, item).await {
        Ok(None) => ReservationError::ItemNotFound { kind, id },
        Ok(Some(_)) => ReservationError::ResourceExhausted { kind, id },
        Err(err) => ReservationError::Persistence(err),
    }
}

/// Atomically decrements `item` by one on the given connection.
///
/// Meant to be called inside a transaction the caller commits; the decrement
/// becomes durable only with that commit.
///
/// ## Errors
/// - `ItemNotFound` if no row has this id in the table for its kind
/// - `ResourceExhausted` if the count is already 0
/// - `Persistence` on a storage failure
pub async fn try_reserve_one(
    conn: &mut SqliteConnection,
    item: &ItemRef,
) -> Result<(), ReservationError> {
    if claim_one(conn, item).await? {
        Ok(())
    } else {
        Err(claim_failure(conn, item).await)
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Pool-backed access to the ledger.
///
/// The committer does not go through this type; it drives the primitives
/// above on its own transaction.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Current count of `item`, `None` if it does not exist.
    pub async fn remaining(&self, item: &ItemRef) -> DbResult<Option<i64>> {
        let mut conn = self.pool.acquire().await?;
        count_of(&mut conn, item).await
    }

    /// Decrements `item` by one in its own transaction.
    ///
    /// Succeeds only after the decrement is committed.
    pub async fn try_reserve_one(&self, item: &ItemRef) -> Result<(), ReservationError> {
        let mut tx = self.pool.begin().await?;
        try_reserve_one(&mut tx, item).await?;
        tx.commit().await.map_err(DbError::transaction_failed)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
