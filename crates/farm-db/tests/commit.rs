//! Integration tests for the reservation commit path.
//!
//! Covers the all-or-nothing guarantee and racing committers against a
//! file-backed database with a multi-connection pool.

use std::sync::Arc;
use std::time::Duration;

use farm_core::{ItemKind, ItemRef, Rank, RankThresholds, ReservationStatus, Role};
use farm_db::{Database, DbConfig, ItemDraft, NewCustomer, ReservationError};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn add_customer(db: &Database, email: &str, credits: i64) -> String {
    let thresholds = RankThresholds::new(100, 500).unwrap();
    db.customers()
        .create(
            &NewCustomer {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                salt: "salt".to_string(),
                name: email.to_string(),
                credits,
                role: Role::Customer,
            },
            &thresholds,
        )
        .await
        .unwrap()
        .id
}

async fn add_product(db: &Database, id: &str, quantity: i64) -> ItemRef {
    db.catalog()
        .create_product(&ItemDraft::new(id, quantity).with_id(id))
        .await
        .unwrap();
    ItemRef::Product(id.to_string())
}

async fn add_activity(db: &Database, id: &str, capacity: i64) -> ItemRef {
    db.catalog()
        .create_activity(&ItemDraft::new(id, capacity).with_id(id))
        .await
        .unwrap();
    ItemRef::Activity(id.to_string())
}

async fn file_db(dir: &TempDir, connections: u32) -> Database {
    let config = DbConfig::new(dir.path().join("farm.db")).max_connections(connections);
    Database::new(config).await.unwrap()
}

// ---------------------------------------------------------------------------
// Successful commit
// ---------------------------------------------------------------------------

/// Customer with 250 credits (Silver), bread quantity 3: one reservation,
/// quantity drops to 2, rank is snapshotted.
#[tokio::test]
async fn test_bread_scenario() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let customer_id = add_customer(&db, "ada@farm.test", 250).await;
    let bread = add_product(&db, "bread", 3).await;

    let reservation = db
        .reservations()
        .commit_reservation(&customer_id, "bread", "product")
        .await
        .unwrap();

    assert_eq!(reservation.customer_id, customer_id);
    assert_eq!(reservation.item, bread);
    assert_eq!(reservation.priority_rank, Rank::Silver);
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert_eq!(db.ledger().remaining(&bread).await.unwrap(), Some(2));

    let all = db.reservations().list_all().await.unwrap();
    assert_eq!(all, vec![reservation]);
}

#[tokio::test]
async fn test_priority_rank_is_frozen() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let customer_id = add_customer(&db, "ada@farm.test", 0).await;
    let tour = add_activity(&db, "farm-tour", 5).await;

    let first = db.reservations().commit(&customer_id, &tour).await.unwrap();
    assert_eq!(first.priority_rank, Rank::Bronze);

    let thresholds = RankThresholds::new(100, 500).unwrap();
    db.customers()
        .update_credits(&customer_id, 900, &thresholds)
        .await
        .unwrap();

    let second = db.reservations().commit(&customer_id, &tour).await.unwrap();
    assert_eq!(second.priority_rank, Rank::Gold);

    let stored = db
        .reservations()
        .get_by_id(&first.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.priority_rank, Rank::Bronze);
    assert_eq!(db.ledger().remaining(&tour).await.unwrap(), Some(3));
}

// ---------------------------------------------------------------------------
// Rejected commits leave no trace
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_item() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let customer_id = add_customer(&db, "ada@farm.test", 0).await;

    let err = db
        .reservations()
        .commit_reservation(&customer_id, "ghost", "activity")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReservationError::ItemNotFound {
            kind: ItemKind::Activity,
            ref id,
        } if id == "ghost"
    ));
    assert_eq!(err.to_string(), "activity not found");
    assert!(db.reservations().list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_exhausted_item() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let customer_id = add_customer(&db, "ada@farm.test", 0).await;
    let jam = add_product(&db, "jam", 0).await;

    let err = db.reservations().commit(&customer_id, &jam).await.unwrap_err();

    assert!(matches!(err, ReservationError::ResourceExhausted { .. }));
    assert_eq!(err.to_string(), "product out of stock");
    assert_eq!(db.ledger().remaining(&jam).await.unwrap(), Some(0));
    assert!(db.reservations().list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_customer_restores_count() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let bread = add_product(&db, "bread", 1).await;

    let err = db.reservations().commit("nobody", &bread).await.unwrap_err();

    assert!(matches!(err, ReservationError::CustomerNotFound));
    assert_eq!(db.ledger().remaining(&bread).await.unwrap(), Some(1));
    assert!(db.reservations().list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_customer_reported_before_item_errors() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let empty = add_product(&db, "empty", 0).await;

    let err = db.reservations().commit("nobody", &empty).await.unwrap_err();
    assert!(matches!(err, ReservationError::CustomerNotFound));

    let err = db
        .reservations()
        .commit_reservation("nobody", "ghost", "product")
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::CustomerNotFound));
}

/// The insert fails after the decrement already ran; the decrement must be
/// rolled back with it.
#[tokio::test]
async fn test_insert_failure_rolls_back_decrement() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let customer_id = add_customer(&db, "ada@farm.test", 0).await;
    let bread = add_product(&db, "bread", 3).await;

    sqlx::query(
        "CREATE TRIGGER reject_reservations BEFORE INSERT ON reservations \
         BEGIN SELECT RAISE(ABORT, 'insert rejected'); END",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let err = db.reservations().commit(&customer_id, &bread).await.unwrap_err();

    assert!(matches!(err, ReservationError::Persistence(_)));
    assert_eq!(db.ledger().remaining(&bread).await.unwrap(), Some(3));
    assert!(db.reservations().list_all().await.unwrap().is_empty());

    // The pool's only connection is usable again after the rollback.
    sqlx::query("DROP TRIGGER reject_reservations")
        .execute(db.pool())
        .await
        .unwrap();
    db.reservations().commit(&customer_id, &bread).await.unwrap();
    assert_eq!(db.ledger().remaining(&bread).await.unwrap(), Some(2));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// Twenty committers race for the last loaf: exactly one wins.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_unit_race_has_one_winner() {
    const RACERS: usize = 20;

    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir, 8).await;
    let bread = add_product(&db, "bread", 1).await;

    let mut customers = Vec::with_capacity(RACERS);
    for n in 0..RACERS {
        customers.push(add_customer(&db, &format!("racer{n}@farm.test"), 0).await);
    }

    let db = Arc::new(db);
    let mut handles = Vec::with_capacity(RACERS);
    for customer_id in customers {
        let db = Arc::clone(&db);
        let bread = bread.clone();
        handles.push(tokio::spawn(async move {
            db.reservations().commit(&customer_id, &bread).await
        }));
    }

    let mut confirmed = 0;
    let mut exhausted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => confirmed += 1,
            Err(ReservationError::ResourceExhausted { .. }) => exhausted += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(confirmed, 1);
    assert_eq!(exhausted, RACERS - 1);
    assert_eq!(db.ledger().remaining(&bread).await.unwrap(), Some(0));
    assert_eq!(db.reservations().count_for_item(&bread).await.unwrap(), 1);
}

/// Many committers against a larger stock: count + reservations is
/// conserved and the count never goes negative.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_commits_conserve_stock() {
    const STOCK: i64 = 7;
    const ATTEMPTS: usize = 16;

    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(file_db(&dir, 6).await);
    let eggs = add_activity(&db, "egg-hunt", STOCK).await;
    let customer_id = add_customer(&db, "ada@farm.test", 0).await;

    let mut handles = Vec::with_capacity(ATTEMPTS);
    for _ in 0..ATTEMPTS {
        let db = Arc::clone(&db);
        let eggs = eggs.clone();
        let customer_id = customer_id.clone();
        handles.push(tokio::spawn(async move {
            db.reservations()
                .commit_reservation(&customer_id, eggs.id(), "activity")
                .await
        }));
    }

    let mut confirmed = 0i64;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => confirmed += 1,
            Err(ReservationError::ResourceExhausted { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(confirmed, STOCK);
    assert_eq!(db.ledger().remaining(&eggs).await.unwrap(), Some(0));
    assert_eq!(
        db.reservations().count_for_item(&eggs).await.unwrap(),
        STOCK
    );
}

/// A credit change that commits while a reservation waits for the write
/// lock does not leak into that reservation's priority rank.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_priority_rank_snapshotted_before_write_lock() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir, 4).await;
    let customer_id = add_customer(&db, "ada@farm.test", 0).await;
    let bread = add_product(&db, "bread", 2).await;

    // Hold the write lock with an uncommitted promotion to Gold.
    let mut writer = db.pool().acquire().await.unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *writer)
        .await
        .unwrap();
    sqlx::query("UPDATE customers SET credits = 900, rank = 'gold' WHERE id = ?1")
        .bind(&customer_id)
        .execute(&mut *writer)
        .await
        .unwrap();

    let pending = {
        let db = db.clone();
        let customer_id = customer_id.clone();
        let bread = bread.clone();
        tokio::spawn(async move { db.reservations().commit(&customer_id, &bread).await })
    };

    // Let the commit take its snapshot and queue behind the writer.
    tokio::time::sleep(Duration::from_millis(300)).await;
    sqlx::query("COMMIT").execute(&mut *writer).await.unwrap();
    drop(writer);

    let reservation = pending.await.unwrap().unwrap();
    assert_eq!(reservation.priority_rank, Rank::Bronze);

    let customer = db.customers().get_by_id(&customer_id).await.unwrap().unwrap();
    assert_eq!(customer.rank, Rank::Gold);
    assert_eq!(db.ledger().remaining(&bread).await.unwrap(), Some(1));
}

/// An account deleted while a reservation waits for the write lock is
/// still reported as missing, and the claim is undone.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_customer_deleted_while_waiting_for_write_lock() {
    let dir = tempfile::tempdir().unwrap();
    let db = file_db(&dir, 4).await;
    let customer_id = add_customer(&db, "ada@farm.test", 0).await;
    let bread = add_product(&db, "bread", 2).await;

    let mut writer = db.pool().acquire().await.unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *writer)
        .await
        .unwrap();
    sqlx::query("DELETE FROM customers WHERE id = ?1")
        .bind(&customer_id)
        .execute(&mut *writer)
        .await
        .unwrap();

    let pending = {
        let db = db.clone();
        let customer_id = customer_id.clone();
        let bread = bread.clone();
        tokio::spawn(async move { db.reservations().commit(&customer_id, &bread).await })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    sqlx::query("COMMIT").execute(&mut *writer).await.unwrap();
    drop(writer);

    let result = pending.await.unwrap();
    assert!(matches!(result, Err(ReservationError::CustomerNotFound)));
    assert_eq!(db.ledger().remaining(&bread).await.unwrap(), Some(2));
    assert_eq!(db.reservations().count_for_item(&bread).await.unwrap(), 0);
}
