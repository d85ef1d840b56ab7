//! Handlers for signup, login and the caller's own profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use farm_core::validation::{validate_email, validate_name, validate_password};
use farm_core::{Customer, Role};
use farm_db::{DbError, NewCustomer};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Same answer for an unknown email and a wrong password.
const INVALID_CREDENTIALS: &str = "invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Request body for `PUT /api/me`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /signup
///
/// Creates a customer account with 0 credits.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    validate_email(&input.email)?;
    validate_name("name", &input.name)?;
    validate_password(&input.password)?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let new = NewCustomer {
        email: normalize_email(&input.email),
        password_hash: hashed.hash,
        salt: hashed.salt,
        name: input.name.trim().to_string(),
        credits: 0,
        role: Role::Customer,
    };

    let customer = state
        .db
        .customers()
        .create(&new, &state.thresholds)
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => {
                AppError::Conflict("email already registered".to_string())
            }
            other => AppError::Db(other),
        })?;

    info!(customer_id = %customer.id, "Customer signed up");

    Ok((StatusCode::CREATED, Json(customer)))
}

/// POST /login
///
/// Verifies the credential and issues a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let customer = state
        .db
        .customers()
        .get_by_email(&normalize_email(&input.email))
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let password_valid = verify_password(&input.password, &customer.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.jwt.issue(&customer)?;

    info!(customer_id = %customer.id, role = %customer.role, "Customer logged in");

    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt.lifetime_secs(),
    }))
}

/// GET /api/me
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Customer>> {
    let customer = state
        .db
        .customers()
        .get_by_id(&user.customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("customer not found".to_string()))?;

    Ok(Json(customer))
}

/// PUT /api/me
///
/// Only the display name is editable by the account holder.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<Customer>> {
    validate_name("name", &input.name)?;

    let customer = state
        .db
        .customers()
        .update_name(&user.customer_id, input.name.trim())
        .await?;

    Ok(Json(customer))
}
