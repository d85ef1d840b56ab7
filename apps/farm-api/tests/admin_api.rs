//! HTTP-level tests for admin account management.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth};
use serde_json::json;

#[tokio::test]
async fn test_set_credits_recomputes_rank() {
    let (app, state) = common::build_test_app().await;
    let (customer_id, _) = common::customer(&app, "ada@farm.test").await;
    let (_admin_id, token) = common::admin(&app, &state, "boss@farm.test").await;

    let uri = format!("/api/admin/users/{customer_id}/credits");

    for (credits, rank) in [(100, "bronze"), (101, "silver"), (500, "silver"), (501, "gold"), (0, "bronze")] {
        let response =
            post_json_auth(app.clone(), &uri, json!({ "credits": credits }), &token).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["credits"], credits);
        assert_eq!(json["rank"], rank, "credits = {credits}");
    }
}

#[tokio::test]
async fn test_negative_credits_rejected() {
    let (app, state) = common::build_test_app().await;
    let (customer_id, _) = common::customer(&app, "ada@farm.test").await;
    let (_admin_id, token) = common::admin(&app, &state, "boss@farm.test").await;

    let response = post_json_auth(
        app,
        &format!("/api/admin/users/{customer_id}/credits"),
        json!({ "credits": -10 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_credits_for_unknown_user_is_404() {
    let (app, state) = common::build_test_app().await;
    let (_admin_id, token) = common::admin(&app, &state, "boss@farm.test").await;

    let response = post_json_auth(
        app,
        "/api/admin/users/nobody/credits",
        json!({ "credits": 10 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_role_takes_effect_at_next_login() {
    let (app, state) = common::build_test_app().await;
    let (customer_id, old_token) = common::customer(&app, "ada@farm.test").await;
    let (_admin_id, token) = common::admin(&app, &state, "boss@farm.test").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/admin/users/{customer_id}/role"),
        json!({ "role": "admin" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["role"], "admin");

    let response = get_auth(app.clone(), "/api/admin/users", &old_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let new_token = common::login(&app, "ada@farm.test").await;
    let response = get_auth(app, "/api/admin/users", &new_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_role_rejected() {
    let (app, state) = common::build_test_app().await;
    let (customer_id, _) = common::customer(&app, "ada@farm.test").await;
    let (_admin_id, token) = common::admin(&app, &state, "boss@farm.test").await;

    let response = post_json_auth(
        app,
        &format!("/api/admin/users/{customer_id}/role"),
        json!({ "role": "farmer" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ROLE");
}

#[tokio::test]
async fn test_list_and_delete_users() {
    let (app, state) = common::build_test_app().await;
    let (customer_id, _) = common::customer(&app, "ada@farm.test").await;
    let (_admin_id, token) = common::admin(&app, &state, "boss@farm.test").await;

    let response = get_auth(app.clone(), "/api/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let users = body_json(response).await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let uri = format!("/api/admin/users/{customer_id}");
    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/admin/users", &token).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}
