//! # Reservation Repository
//!
//! The Reservation Committer plus read and admin access to the reservation
//! log.
//!
//! ## Commit Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    commit(customer_id, item)                            │
//! │                                                                         │
//! │  0. SELECT rank FROM customers         missing → CustomerNotFound       │
//! │     (own connection, before BEGIN)     rank snapshot for step 4         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   │                                                                     │
//! │   ├─ 1. ledger::claim_one(item)        UPDATE ... WHERE n > 0           │
//! │   │      (first statement: takes the write lock)                        │
//! │   │                                                                     │
//! │   ├─ 2. customer still exists?         no → ROLLBACK                    │
//! │   │                                         CustomerNotFound            │
//! │   │                                                                     │
//! │   ├─ 3. claim failed?                  → ROLLBACK                       │
//! │   │                                      ItemNotFound | ResourceExhausted│
//! │   │                                                                     │
//! │   ├─ 4. INSERT reservation             status = confirmed               │
//! │   │      priority_rank = snapshot from step 0                           │
//! │   │                                                                     │
//! │  COMMIT                                TransactionFailed on error       │
//! │                                                                         │
//! │  Any error after BEGIN drops the transaction, which rolls back: the     │
//! │  decrement and the insert become visible together or not at all.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rank is read before the transaction queues on the write lock, so a
//! credit change that lands while the call is waiting does not leak into
//! the snapshot. The customer check is reported ahead of any item error
//! even though the claim runs first; the rollback undoes the claim either
//! way.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult, ReservationError};
use crate::repository::ledger;
use farm_core::{ItemKind, ItemRef, Rank, Reservation, ReservationStatus};

/// Row shape of the `reservations` table.
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: String,
    customer_id: String,
    item_type: ItemKind,
    item_id: String,
    priority_rank: Rank,
    timestamp: DateTime<Utc>,
    status: ReservationStatus,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation {
            id: row.id,
            customer_id: row.customer_id,
            item: ItemRef::new(row.item_type, row.item_id),
            priority_rank: row.priority_rank,
            timestamp: row.timestamp,
            status: row.status,
        }
    }
}

/// Repository for reservation operations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationRepository { pool }
    }

    /// Reserves one unit of an item given its untyped tag.
    ///
    /// Parses `item_type` and delegates to [`commit`](Self::commit).
    ///
    /// ## Errors
    /// - `InvalidReservationType` if `item_type` is not `product`/`activity`
    /// - everything [`commit`](Self::commit) returns
    pub async fn commit_reservation(
        &self,
        customer_id: &str,
        item_id: &str,
        item_type: &str,
    ) -> Result<Reservation, ReservationError> {
        let item = ItemRef::parse(item_type, item_id)
            .map_err(|_| ReservationError::InvalidReservationType(item_type.to_string()))?;

        self.commit(customer_id, &item).await
    }

    /// Reserves one unit of `item` for `customer_id`, all or nothing.
    ///
    /// On success the item's count is one lower and a `confirmed`
    /// reservation carrying the customer's current rank exists. On any error
    /// neither change is visible.
    ///
    /// ## Errors
    /// - `CustomerNotFound` if the customer does not exist (checked first)
    /// - `ItemNotFound` if the item does not exist
    /// - `ResourceExhausted` if the count is already 0
    /// - `Persistence` on a storage failure
    pub async fn commit(
        &self,
        customer_id: &str,
        item: &ItemRef,
    ) -> Result<Reservation, ReservationError> {
        debug!(customer_id = %customer_id, item = %item, "Committing reservation");

        // Snapshot the rank before queueing for the write lock, so a credit
        // change that commits while this call waits is not picked up.
        let priority_rank = {
            let mut conn = self.pool.acquire().await?;
            customer_rank(&mut conn, customer_id).await?
        };
        let Some(priority_rank) = priority_rank else {
            debug!(customer_id = %customer_id, "Reservation rejected: unknown customer");
            return Err(ReservationError::CustomerNotFound);
        };

        let mut tx = self.pool.begin().await?;

        let claimed = ledger::claim_one(&mut tx, item).await?;

        // The account may have been deleted since the snapshot.
        if customer_rank(&mut tx, customer_id).await?.is_none() {
            rollback(tx).await;
            debug!(customer_id = %customer_id, "Reservation rejected: unknown customer");
            return Err(ReservationError::CustomerNotFound);
        }

        if !claimed {
            let err = ledger::claim_failure(&mut tx, item).await;
            rollback(tx).await;
            debug!(item = %item, error = %err, "Reservation rejected");
            return Err(err);
        }

        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            item: item.clone(),
            priority_rank,
            timestamp: Utc::now(),
            status: ReservationStatus::Confirmed,
        };

        insert(&mut tx, &reservation).await?;

        tx.commit().await.map_err(DbError::transaction_failed)?;

        info!(
            id = %reservation.id,
            customer_id = %customer_id,
            item = %item,
            priority_rank = %priority_rank,
            "Reservation confirmed"
        );

        Ok(reservation)
    }

    /// Gets a reservation by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Reservation>> {
        let row = sqlx::query_as::<_, ReservationRow>("SELECT * FROM reservations WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Reservation::from))
    }

    /// Lists every reservation, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(
            "SELECT * FROM reservations ORDER BY timestamp, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    /// Lists one customer's reservations, oldest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(
            "SELECT * FROM reservations WHERE customer_id = ?1 ORDER BY timestamp, id",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    /// Counts reservations held against one item.
    pub async fn count_for_item(&self, item: &ItemRef) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reservations WHERE item_type = ?1 AND item_id = ?2",
        )
        .bind(item.kind())
        .bind(item.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Removes a reservation. The item's count is not restored.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting reservation");

        let result = sqlx::query("DELETE FROM reservations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Reservation", id));
        }

        Ok(())
    }
}

// =============================================================================
// Transaction helpers
// =============================================================================

/// Rolls back a transaction whose outcome is already decided.
///
/// A failed rollback is logged and otherwise ignored: SQLite discards the
/// uncommitted writes when the connection is reset.
async fn rollback(tx: Transaction<'_, Sqlite>) {
    if let Err(err) = tx.rollback().await {
        warn!(error = %err, "Rollback failed");
    }
}

async fn customer_rank(conn: &mut SqliteConnection, customer_id: &str) -> DbResult<Option<Rank>> {
    let rank = sqlx::query_scalar::<_, Rank>("SELECT rank FROM customers WHERE id = ?1")
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(rank)
}

async fn insert(conn: &mut SqliteConnection, reservation: &Reservation) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO reservations (
            id, customer_id, item_type, item_id,
            priority_rank, timestamp, status
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&reservation.id)
    .bind(&reservation.customer_id)
    .bind(reservation.item.kind())
    .bind(reservation.item.id())
    .bind(reservation.priority_rank)
    .bind(reservation.timestamp)
    .bind(reservation.status)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
