//! # Customer Repository
//!
//! Account records: credentials, credits and the derived loyalty rank.
//!
//! ## Rank Synchronization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_credits(id, 250, thresholds)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rank = thresholds.rank_for(250)        ← farm_core::rank               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE customers SET credits = 250, rank = 'silver' WHERE id = ?       │
//! │                                                                         │
//! │  Credits and rank change in ONE statement, so no reader ever sees a     │
//! │  rank that disagrees with the credits next to it.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use farm_core::{Customer, RankThresholds, Role};

/// Input for creating an account. Credentials arrive already hashed.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub name: String,
    pub credits: i64,
    pub role: Role,
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new account, stamping the rank from the initial credits.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the email is already registered.
    pub async fn create(&self, new: &NewCustomer, thresholds: &RankThresholds) -> DbResult<Customer> {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            salt: new.salt.clone(),
            name: new.name.clone(),
            credits: new.credits,
            rank: thresholds.rank_for(new.credits),
            role: new.role,
            created_at: Utc::now(),
        };

        debug!(id = %customer.id, email = %customer.email, "Creating customer");

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, email, password_hash, salt, name,
                credits, rank, role, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.email)
        .bind(&customer.password_hash)
        .bind(&customer.salt)
        .bind(&customer.name)
        .bind(customer.credits)
        .bind(customer.rank)
        .bind(customer.role)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&customer.email))?;

        Ok(customer)
    }

    /// Gets a customer by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Gets a customer by login email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Lists all customers, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(customers)
    }

    /// Sets the credit balance and re-derives the rank in the same statement.
    ///
    /// Existing reservations keep the rank they were booked with.
    pub async fn update_credits(
        &self,
        id: &str,
        credits: i64,
        thresholds: &RankThresholds,
    ) -> DbResult<Customer> {
        let rank = thresholds.rank_for(credits);

        debug!(id = %id, credits, rank = %rank, "Updating credits");

        let result = sqlx::query("UPDATE customers SET credits = ?2, rank = ?3 WHERE id = ?1")
            .bind(id)
            .bind(credits)
            .bind(rank)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        self.require(id).await
    }

    /// Changes the account role.
    pub async fn update_role(&self, id: &str, role: Role) -> DbResult<Customer> {
        debug!(id = %id, role = %role, "Updating role");

        let result = sqlx::query("UPDATE customers SET role = ?2 WHERE id = ?1")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        self.require(id).await
    }

    /// Changes the display name.
    pub async fn update_name(&self, id: &str, name: &str) -> DbResult<Customer> {
        let result = sqlx::query("UPDATE customers SET name = ?2 WHERE id = ?1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        self.require(id).await
    }

    /// Deletes the account. Its reservations go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    async fn require(&self, id: &str) -> DbResult<Customer> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use farm_core::Rank;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            salt: "salt".to_string(),
            name: "Ada".to_string(),
            credits: 0,
            role: Role::Customer,
        }
    }

    async fn setup() -> CustomerRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().customers()
    }

    #[tokio::test]
    async fn test_create_stamps_rank() {
        let repo = setup().await;
        let thresholds = RankThresholds::default();

        let created = repo
            .create(&new_customer("ada@farm.test"), &thresholds)
            .await
            .unwrap();
        assert_eq!(created.rank, Rank::Bronze);

        let loaded = repo.get_by_email("ada@farm.test").await.unwrap().unwrap();
        assert_eq!(loaded.id, created.id);
        assert_eq!(loaded.rank, Rank::Bronze);
        assert_eq!(loaded.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = setup().await;
        let thresholds = RankThresholds::default();

        repo.create(&new_customer("ada@farm.test"), &thresholds)
            .await
            .unwrap();
        let err = repo
            .create(&new_customer("ada@farm.test"), &thresholds)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_credits_resyncs_rank() {
        let repo = setup().await;
        let thresholds = RankThresholds::new(100, 500).unwrap();
        let customer = repo
            .create(&new_customer("ada@farm.test"), &thresholds)
            .await
            .unwrap();

        let silver = repo.update_credits(&customer.id, 101, &thresholds).await.unwrap();
        assert_eq!((silver.credits, silver.rank), (101, Rank::Silver));

        let gold = repo.update_credits(&customer.id, 501, &thresholds).await.unwrap();
        assert_eq!(gold.rank, Rank::Gold);

        let bronze = repo.update_credits(&customer.id, 100, &thresholds).await.unwrap();
        assert_eq!(bronze.rank, Rank::Bronze);
    }

    #[tokio::test]
    async fn test_negative_credits_rejected_by_storage() {
        let repo = setup().await;
        let thresholds = RankThresholds::default();
        let customer = repo
            .create(&new_customer("ada@farm.test"), &thresholds)
            .await
            .unwrap();

        let err = repo
            .update_credits(&customer.id, -1, &thresholds)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_role_name_and_delete() {
        let repo = setup().await;
        let customer = repo
            .create(&new_customer("ada@farm.test"), &RankThresholds::default())
            .await
            .unwrap();

        let admin = repo.update_role(&customer.id, Role::Admin).await.unwrap();
        assert!(admin.is_admin());

        let renamed = repo.update_name(&customer.id, "Ada L.").await.unwrap();
        assert_eq!(renamed.name, "Ada L.");

        repo.delete(&customer.id).await.unwrap();
        assert!(repo.get_by_id(&customer.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&customer.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
