//! Admin handlers for customer accounts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use farm_core::validation::validate_non_negative;
use farm_core::{Customer, Role};

use crate::auth::RequireAdmin;
use crate::error::AppResult;
use crate::state::AppState;

/// Request body for `POST /api/admin/users/{id}/credits`.
#[derive(Debug, Deserialize)]
pub struct SetCreditsRequest {
    pub credits: i64,
}

/// Request body for `POST /api/admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(state.db.customers().list().await?))
}

/// DELETE /api/admin/users/{id}
///
/// The account's reservations are removed with it.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.db.customers().delete(&id).await?;

    info!(admin_id = %admin.customer_id, customer_id = %id, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/users/{id}/credits
///
/// Sets the balance; the rank follows.
pub async fn set_credits(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<SetCreditsRequest>,
) -> AppResult<Json<Customer>> {
    validate_non_negative("credits", input.credits)?;

    let customer = state
        .db
        .customers()
        .update_credits(&id, input.credits, &state.thresholds)
        .await?;

    info!(
        admin_id = %admin.customer_id,
        customer_id = %id,
        credits = customer.credits,
        rank = %customer.rank,
        "Credits updated"
    );
    Ok(Json(customer))
}

/// POST /api/admin/users/{id}/role
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<SetRoleRequest>,
) -> AppResult<Json<Customer>> {
    let role: Role = input.role.parse()?;

    let customer = state.db.customers().update_role(&id, role).await?;

    info!(admin_id = %admin.customer_id, customer_id = %id, role = %role, "Role updated");
    Ok(Json(customer))
}
