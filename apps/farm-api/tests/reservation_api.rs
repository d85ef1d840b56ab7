//! HTTP-level tests for reserving items.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth};
use serde_json::json;

use farm_core::ItemRef;
use farm_db::ItemDraft;

#[tokio::test]
async fn test_reserve_bread_scenario() {
    let (app, state) = common::build_test_app().await;
    let (id, token) = common::customer(&app, "ada@farm.test").await;

    state
        .db
        .customers()
        .update_credits(&id, 250, &state.thresholds)
        .await
        .unwrap();
    state
        .db
        .catalog()
        .create_product(&ItemDraft::new("Bread", 3).with_id("bread"))
        .await
        .unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/reserve",
        json!({ "item_id": "bread", "type": "product" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let reservation = body_json(response).await;
    assert_eq!(reservation["customer_id"], id.as_str());
    assert_eq!(reservation["item_id"], "bread");
    assert_eq!(reservation["type"], "product");
    assert_eq!(reservation["priority_rank"], "silver");
    assert_eq!(reservation["status"], "confirmed");

    let remaining = state
        .db
        .ledger()
        .remaining(&ItemRef::Product("bread".to_string()))
        .await
        .unwrap();
    assert_eq!(remaining, Some(2));

    let response = get_auth(app, "/api/reservations", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let mine = body_json(response).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["id"], reservation["id"]);
}

#[tokio::test]
async fn test_reserve_missing_item() {
    let (app, _state) = common::build_test_app().await;
    let (_id, token) = common::customer(&app, "ada@farm.test").await;

    let response = post_json_auth(
        app,
        "/api/reserve",
        json!({ "item_id": "ghost", "type": "activity" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "ITEM_NOT_FOUND");
    assert_eq!(json["error"], "activity not found");
}

#[tokio::test]
async fn test_reserve_exhausted_activity() {
    let (app, state) = common::build_test_app().await;
    let (_id, token) = common::customer(&app, "ada@farm.test").await;

    state
        .db
        .catalog()
        .create_activity(&ItemDraft::new("Harvest Day", 1).with_id("harvest"))
        .await
        .unwrap();

    let body = json!({ "item_id": "harvest", "type": "activity" });

    let response = post_json_auth(app.clone(), "/api/reserve", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(app.clone(), "/api/reserve", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "RESOURCE_EXHAUSTED");
    assert_eq!(json["error"], "activity fully booked");

    let response = get_auth(app, "/api/reservations", &token).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reserve_invalid_type() {
    let (app, _state) = common::build_test_app().await;
    let (_id, token) = common::customer(&app, "ada@farm.test").await;

    let response = post_json_auth(
        app,
        "/api/reserve",
        json!({ "item_id": "bread", "type": "vegetable" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_RESERVATION_TYPE");
}

#[tokio::test]
async fn test_reserve_after_account_deleted() {
    let (app, state) = common::build_test_app().await;
    let (id, token) = common::customer(&app, "ada@farm.test").await;

    state
        .db
        .catalog()
        .create_product(&ItemDraft::new("Bread", 1).with_id("bread"))
        .await
        .unwrap();
    state.db.customers().delete(&id).await.unwrap();

    // The token is still valid, but the account is gone.
    let response = post_json_auth(
        app,
        "/api/reserve",
        json!({ "item_id": "bread", "type": "product" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "CUSTOMER_NOT_FOUND");

    let remaining = state
        .db
        .ledger()
        .remaining(&ItemRef::Product("bread".to_string()))
        .await
        .unwrap();
    assert_eq!(remaining, Some(1));
}

#[tokio::test]
async fn test_reserve_requires_token() {
    let (app, _state) = common::build_test_app().await;

    let response = common::post_json(
        app,
        "/api/reserve",
        json!({ "item_id": "bread", "type": "product" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_lists_and_deletes_reservations_without_restock() {
    let (app, state) = common::build_test_app().await;
    let (_customer_id, customer_token) = common::customer(&app, "ada@farm.test").await;
    let (_admin_id, admin_token) = common::admin(&app, &state, "boss@farm.test").await;

    state
        .db
        .catalog()
        .create_product(&ItemDraft::new("Bread", 2).with_id("bread"))
        .await
        .unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/reserve",
        json!({ "item_id": "bread", "type": "product" }),
        &customer_token,
    )
    .await;
    let reservation_id = body_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Customers cannot see the admin list.
    let response = get_auth(app.clone(), "/api/admin/reservations", &customer_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app.clone(), "/api/admin/reservations", &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let uri = format!("/api/admin/reservations/{reservation_id}");
    let response = delete_auth(app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let remaining = state
        .db
        .ledger()
        .remaining(&ItemRef::Product("bread".to_string()))
        .await
        .unwrap();
    assert_eq!(remaining, Some(1));
}
