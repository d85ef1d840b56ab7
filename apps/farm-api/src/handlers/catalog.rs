//! Handlers for products and activities.
//!
//! Customers see visible items only. The `/api/admin/...` routes see
//! everything and manage the catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use farm_core::validation::{validate_name, validate_non_negative};
use farm_core::{Activity, Product};
use farm_db::ItemDraft;

use crate::auth::{AuthUser, RequireAdmin};
use crate::error::AppResult;
use crate::state::AppState;

fn default_visible() -> bool {
    true
}

/// Request body for creating or replacing a product.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    /// Ignored on update. Generated on create when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub quantity: i64,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// Request body for creating or replacing an activity.
#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub capacity: i64,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn draft(
    id: Option<String>,
    name: String,
    description: String,
    image_url: String,
    count: (&str, i64),
    visible: bool,
) -> AppResult<ItemDraft> {
    validate_name("name", &name)?;
    validate_non_negative(count.0, count.1)?;

    Ok(ItemDraft {
        id,
        name: name.trim().to_string(),
        description,
        image_url,
        count: count.1,
        visible,
    })
}

impl TryFrom<ProductRequest> for ItemDraft {
    type Error = crate::error::AppError;

    fn try_from(req: ProductRequest) -> AppResult<Self> {
        draft(
            req.id,
            req.name,
            req.description,
            req.image_url,
            ("quantity", req.quantity),
            req.visible,
        )
    }
}

impl TryFrom<ActivityRequest> for ItemDraft {
    type Error = crate::error::AppError;

    fn try_from(req: ActivityRequest) -> AppResult<Self> {
        draft(
            req.id,
            req.name,
            req.description,
            req.image_url,
            ("capacity", req.capacity),
            req.visible,
        )
    }
}

// ---------------------------------------------------------------------------
// Customer-facing
// ---------------------------------------------------------------------------

/// GET /api/products
pub async fn list_visible_products(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.db.catalog().list_products(true).await?))
}

/// GET /api/activities
pub async fn list_visible_activities(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<Activity>>> {
    Ok(Json(state.db.catalog().list_activities(true).await?))
}

// ---------------------------------------------------------------------------
// Admin: products
// ---------------------------------------------------------------------------

/// GET /api/admin/products
pub async fn list_products(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.db.catalog().list_products(false).await?))
}

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<ProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let draft = ItemDraft::try_from(input)?;
    let product = state.db.catalog().create_product(&draft).await?;

    info!(admin_id = %admin.customer_id, product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/admin/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<ProductRequest>,
) -> AppResult<Json<Product>> {
    let draft = ItemDraft::try_from(input)?;
    Ok(Json(state.db.catalog().update_product(&id, &draft).await?))
}

/// DELETE /api/admin/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.db.catalog().delete_product(&id).await?;

    info!(admin_id = %admin.customer_id, product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin: activities
// ---------------------------------------------------------------------------

/// GET /api/admin/activities
pub async fn list_activities(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<Vec<Activity>>> {
    Ok(Json(state.db.catalog().list_activities(false).await?))
}

/// POST /api/admin/activities
pub async fn create_activity(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<ActivityRequest>,
) -> AppResult<(StatusCode, Json<Activity>)> {
    let draft = ItemDraft::try_from(input)?;
    let activity = state.db.catalog().create_activity(&draft).await?;

    info!(admin_id = %admin.customer_id, activity_id = %activity.id, "Activity created");
    Ok((StatusCode::CREATED, Json(activity)))
}

/// PUT /api/admin/activities/{id}
pub async fn update_activity(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<ActivityRequest>,
) -> AppResult<Json<Activity>> {
    let draft = ItemDraft::try_from(input)?;
    Ok(Json(state.db.catalog().update_activity(&id, &draft).await?))
}

/// DELETE /api/admin/activities/{id}
pub async fn delete_activity(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.db.catalog().delete_activity(&id).await?;

    info!(admin_id = %admin.customer_id, activity_id = %id, "Activity deleted");
    Ok(StatusCode::NO_CONTENT)
}
