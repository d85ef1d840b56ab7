#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use farm_api::{build_app, AppConfig, AppState};
use farm_core::Role;
use farm_db::{Database, DbConfig};

pub const PASSWORD: &str = "harvest-moon-42";

/// Application state over a fresh in-memory database and default config.
pub async fn test_state() -> AppState {
    let db = Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database should open");
    AppState::new(db, AppConfig::default()).expect("default config is valid")
}

/// The production router over a fresh state. Returns both so tests can
/// arrange data through the repositories.
pub async fn build_test_app() -> (Router, AppState) {
    let state = test_state().await;
    (build_app(state.clone()), state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Reads the whole body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Signs up through the API and returns the new customer id.
pub async fn signup(app: &Router, email: &str) -> String {
    let response = post_json(
        app.clone(),
        "/signup",
        json!({ "email": email, "password": PASSWORD, "name": "Test Customer" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"]
        .as_str()
        .expect("signup returns an id")
        .to_string()
}

/// Logs in through the API and returns the bearer token.
pub async fn login(app: &Router, email: &str) -> String {
    let response = post_json(
        app.clone(),
        "/login",
        json!({ "email": email, "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .expect("login returns a token")
        .to_string()
}

/// A signed-up customer: `(id, token)`.
pub async fn customer(app: &Router, email: &str) -> (String, String) {
    let id = signup(app, email).await;
    let token = login(app, email).await;
    (id, token)
}

/// A signed-up account promoted to admin before logging in: `(id, token)`.
pub async fn admin(app: &Router, state: &AppState, email: &str) -> (String, String) {
    let id = signup(app, email).await;
    state
        .db
        .customers()
        .update_role(&id, Role::Admin)
        .await
        .expect("promotion should succeed");
    let token = login(app, email).await;
    (id, token)
}
