//! Handlers for reserving items and reading reservations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use farm_core::Reservation;

use crate::auth::{AuthUser, RequireAdmin};
use crate::error::AppResult;
use crate::state::AppState;

/// Request body for `POST /api/reserve`.
///
/// `type` stays a plain string here; the committer parses it so an unknown
/// tag is reported as an invalid reservation type.
#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub item_id: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

/// POST /api/reserve
///
/// Reserves one unit for the caller.
pub async fn reserve(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ReserveRequest>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = state
        .db
        .reservations()
        .commit_reservation(&user.customer_id, &input.item_id, &input.item_type)
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /api/reservations
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state
        .db
        .reservations()
        .list_for_customer(&user.customer_id)
        .await?;

    Ok(Json(reservations))
}

/// GET /api/admin/reservations
pub async fn list_all(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(state.db.reservations().list_all().await?))
}

/// DELETE /api/admin/reservations/{id}
///
/// The reserved unit is not returned to stock.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.db.reservations().delete(&id).await?;

    info!(admin_id = %admin.customer_id, reservation_id = %id, "Reservation deleted");
    Ok(StatusCode::NO_CONTENT)
}
