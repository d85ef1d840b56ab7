//! # Catalog Repository
//!
//! CRUD for products and activities.
//!
//! Both tables share one shape apart from the counter column
//! (`quantity` vs `capacity`), so the SQL is shared and the table is picked
//! from the item kind. Counter changes made here are administrative; the
//! reservation path decrements through the ledger only.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::ledger::counter_for;
use farm_core::{Activity, ItemKind, Product};

/// Input for creating or fully replacing a product or activity.
///
/// `count` is the product quantity or the activity capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    /// Explicit id. Generated (UUID v4) when absent or blank.
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub count: i64,
    pub visible: bool,
}

impl ItemDraft {
    /// A visible item with no description or image.
    pub fn new(name: impl Into<String>, count: i64) -> Self {
        ItemDraft {
            id: None,
            name: name.into(),
            description: String::new(),
            image_url: String::new(),
            count,
            visible: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    fn resolved_id(&self) -> String {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        }
    }
}

/// Repository for product and activity records.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn create_product(&self, draft: &ItemDraft) -> DbResult<Product> {
        self.create(ItemKind::Product, draft).await
    }

    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        self.get(ItemKind::Product, id).await
    }

    /// Lists products by name. `visible_only` hides items customers can't see.
    pub async fn list_products(&self, visible_only: bool) -> DbResult<Vec<Product>> {
        self.list(ItemKind::Product, visible_only).await
    }

    pub async fn update_product(&self, id: &str, draft: &ItemDraft) -> DbResult<Product> {
        self.update(ItemKind::Product, id, draft).await
    }

    pub async fn delete_product(&self, id: &str) -> DbResult<()> {
        self.delete(ItemKind::Product, id).await
    }

    // =========================================================================
    // Activities
    // =========================================================================

    pub async fn create_activity(&self, draft: &ItemDraft) -> DbResult<Activity> {
        self.create(ItemKind::Activity, draft).await
    }

    pub async fn get_activity(&self, id: &str) -> DbResult<Option<Activity>> {
        self.get(ItemKind::Activity, id).await
    }

    pub async fn list_activities(&self, visible_only: bool) -> DbResult<Vec<Activity>> {
        self.list(ItemKind::Activity, visible_only).await
    }

    pub async fn update_activity(&self, id: &str, draft: &ItemDraft) -> DbResult<Activity> {
        self.update(ItemKind::Activity, id, draft).await
    }

    pub async fn delete_activity(&self, id: &str) -> DbResult<()> {
        self.delete(ItemKind::Activity, id).await
    }

    // =========================================================================
    // Shared SQL
    // =========================================================================

    async fn create<T>(&self, kind: ItemKind, draft: &ItemDraft) -> DbResult<T>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let (table, column) = counter_for(kind);
        let id = draft.resolved_id();
        let now = Utc::now();

        debug!(kind = %kind, id = %id, name = %draft.name, "Creating catalog item");

        let sql = format!(
            "INSERT INTO {table} (id, name, description, image_url, {column}, visible, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)"
        );

        sqlx::query(&sql)
            .bind(&id)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.image_url)
            .bind(draft.count)
            .bind(draft.visible)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_duplicate_value(&id))?;

        self.get(kind, &id)
            .await?
            .ok_or_else(|| DbError::not_found(kind.as_str(), &id))
    }

    async fn get<T>(&self, kind: ItemKind, id: &str) -> DbResult<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let (table, _) = counter_for(kind);
        let sql = format!("SELECT * FROM {table} WHERE id = ?1");

        let item = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn list<T>(&self, kind: ItemKind, visible_only: bool) -> DbResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let (table, _) = counter_for(kind);
        let filter = if visible_only { "WHERE visible = 1" } else { "" };
        let sql = format!("SELECT * FROM {table} {filter} ORDER BY name, id");

        let items = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;

        debug!(kind = %kind, visible_only, count = items.len(), "Listed catalog items");
        Ok(items)
    }

    /// Full replace of the editable fields. `draft.id` is ignored.
    async fn update<T>(&self, kind: ItemKind, id: &str, draft: &ItemDraft) -> DbResult<T>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let (table, column) = counter_for(kind);

        debug!(kind = %kind, id = %id, "Updating catalog item");

        let sql = format!(
            "UPDATE {table} SET name = ?2, description = ?3, image_url = ?4, {column} = ?5, \
             visible = ?6, updated_at = ?7 WHERE id = ?1"
        );

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.image_url)
            .bind(draft.count)
            .bind(draft.visible)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(kind.as_str(), id));
        }

        self.get(kind, id)
            .await?
            .ok_or_else(|| DbError::not_found(kind.as_str(), id))
    }

    /// Deletes the item. Reservations that reference it are kept.
    async fn delete(&self, kind: ItemKind, id: &str) -> DbResult<()> {
        let (table, _) = counter_for(kind);

        debug!(kind = %kind, id = %id, "Deleting catalog item");

        let sql = format!("DELETE FROM {table} WHERE id = ?1");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(kind.as_str(), id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
