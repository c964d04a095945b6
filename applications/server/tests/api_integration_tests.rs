/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::{active_user, new_user, TestStore, UnavailableStore};
use roster_core::{filter::predicates::start_of_today, types::MALE};
use roster_server::{api, state::AppState};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Helper to create test app router over a fresh database
async fn create_test_app() -> (Router, TestStore) {
    let store = TestStore::new().await;
    let app = api::router(store.app_state());
    (app, store)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _store) = create_test_app().await;

    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_bulk_create_redirects_to_index() {
    let today = start_of_today();
    let (app, _store) = create_test_app().await;

    let users = serde_json::to_value(vec![
        active_user(1),
        new_user(2, false, MALE, today),
    ])
    .unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/api/users/bulk", &users))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/users");

    let response = app.oneshot(get("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let contacts = body_json(response).await;
    assert_eq!(
        contacts,
        serde_json::json!([{ "name": "User 1", "mail": "user1@example.com" }])
    );
}

#[tokio::test]
async fn test_bulk_create_conflict_persists_nothing() {
    let (app, store) = create_test_app().await;

    let users = serde_json::to_value(vec![active_user(1), active_user(1)]).unwrap();

    let response = app
        .oneshot(post_json("/api/users/bulk", &users))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(store.service().list_active_users_alt().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_listings_are_empty_arrays() {
    let (app, _store) = create_test_app().await;

    for uri in ["/api/users", "/api/users/active", "/api/users/registered-today"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_json(response).await, serde_json::json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_registered_today_and_full_active_listing() {
    let today = start_of_today();
    let (app, store) = create_test_app().await;

    store
        .service()
        .create_users(vec![
            new_user(1, true, MALE, today),
            new_user(2, true, 2, today),
            new_user(3, false, MALE, today),
        ])
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/users/registered-today"))
        .await
        .unwrap();
    let today = body_json(response).await;
    assert_eq!(today.as_array().unwrap().len(), 1);
    assert_eq!(today[0]["user_id"], 1);

    let response = app.oneshot(get("/api/users/active")).await.unwrap();
    let active = body_json(response).await;
    assert_eq!(active.as_array().unwrap().len(), 2);
    assert_eq!(active[1]["city"], "Madrid");
}

#[tokio::test]
async fn test_lookup_by_external_id() {
    let (app, store) = create_test_app().await;

    store
        .service()
        .create_users(vec![active_user(42)])
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/users/external/42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "User 42");

    let response = app.oneshot(get("/api/users/external/7")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_form_create_edit_delete_cycle() {
    let (app, store) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(post_form(
            "/api/users/create",
            "user_id=5&name=Lin&mail=lin%40example.com&city=Taipei&gender=1&is_active=on&registered_at=2024-06-01T10%3A00",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/users");

    let created = store
        .service()
        .find_user_by_external_id(5)
        .await
        .unwrap()
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_form(
            &format!("/api/users/{}/edit", created.id),
            "user_id=5&name=Lin+Wei&mail=lin%40example.com&city=Taipei&gender=1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/users/{}", created.id)))
        .await
        .unwrap();
    let details = body_json(response).await;
    assert_eq!(details["name"], "Lin Wei");
    assert_eq!(details["is_active"], false);

    let response = app
        .clone()
        .oneshot(post_form(&format!("/api/users/{}/delete", created.id), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(get(&format!("/api/users/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_form_is_redisplayed() {
    let (app, store) = create_test_app().await;

    let response = app
        .oneshot(post_form(
            "/api/users/create",
            "user_id=abc&name=Lin&mail=lin%40example.com&city=Taipei&gender=1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let view = body_json(response).await;
    assert_eq!(view["input"]["user_id"], "abc");
    assert_eq!(view["input"]["name"], "Lin");
    assert!(view["error"].as_str().unwrap().contains("user_id"));

    assert!(store.service().list_active_users_alt().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_form_conflict_and_missing_record_are_redisplayed() {
    let (app, store) = create_test_app().await;

    store
        .service()
        .create_users(vec![active_user(1)])
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_form(
            "/api/users/create",
            "user_id=1&name=Dup&mail=dup%40example.com&city=X&gender=2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["input"]["name"], "Dup");

    let response = app
        .oneshot(post_form("/api/users/999/delete", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let view = body_json(response).await;
    assert_eq!(view["input"], "999");
    assert!(view["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_non_numeric_record_id_is_redisplayed() {
    let (app, store) = create_test_app().await;

    store
        .service()
        .create_users(vec![active_user(1)])
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_form("/api/users/abc/delete", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let view = body_json(response).await;
    assert_eq!(view["input"], "abc");
    assert!(view["error"].as_str().unwrap().contains("record id"));

    let response = app
        .oneshot(post_form(
            "/api/users/abc/edit",
            "user_id=1&name=Renamed&mail=user1%40example.com&city=X&gender=2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let view = body_json(response).await;
    assert_eq!(view["input"]["name"], "Renamed");
    assert!(view["error"].as_str().unwrap().contains("record id"));

    let user = store
        .service()
        .find_user_by_external_id(1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name, "User 1");
}

#[tokio::test]
async fn test_unavailable_store_is_service_unavailable() {
    let app = api::router(AppState::from_store(Arc::new(UnavailableStore)));

    let response = app.oneshot(get("/api/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["error"], "Store unavailable");
}
