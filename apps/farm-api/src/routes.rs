//! Router assembly.
//!
//! ```text
//! /health                      public
//! /signup, /login              public
//! /api/...                     bearer token (AuthUser)
//! /api/admin/...               bearer token + admin role (RequireAdmin)
//! ```
//!
//! Authorization is enforced by the extractors each handler takes, not by
//! route-level middleware.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{account, admin, catalog, health, reservation};
use crate::state::AppState;

/// Build the full application [`Router`] with all middleware layers.
///
/// Shared by `main.rs` and the integration tests.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/signup", post(account::signup))
        .route("/login", post(account::login))
        .nest("/api", api_routes())
        // Panic recovery: catch panics and return 500.
        .layer(CatchPanicLayer::new())
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(account::get_me).put(account::update_me))
        .route("/products", get(catalog::list_visible_products))
        .route("/activities", get(catalog::list_visible_activities))
        .route("/reserve", post(reservation::reserve))
        .route("/reservations", get(reservation::list_mine))
        .nest("/admin", admin_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            put(catalog::update_product).delete(catalog::delete_product),
        )
        .route(
            "/activities",
            get(catalog::list_activities).post(catalog::create_activity),
        )
        .route(
            "/activities/{id}",
            put(catalog::update_activity).delete(catalog::delete_activity),
        )
        .route("/reservations", get(reservation::list_all))
        .route("/reservations/{id}", delete(reservation::delete))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/users/{id}/credits", post(admin::set_credits))
        .route("/users/{id}/role", post(admin::set_role))
}
