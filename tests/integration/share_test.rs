//! Integration tests for share links and their public resolution.

mod helpers;

use chrono::{Duration, Utc};
use http::StatusCode;
use serde_json::json;

use locker_auth::password::PasswordHasher;
use locker_core::types::UserId;
use locker_database::ShareStore;
use locker_entity::share::CreateDocumentShare;

use helpers::TestApp;

async fn share(app: &TestApp, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = app.request("POST", "/api/shares", Some(body), Some(token)).await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "Share failed: {:?}",
        response.body
    );
    response.body["data"].clone()
}

fn share_token(link: &serde_json::Value) -> String {
    link["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_open_share_resolves_to_document() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "Resume_2024.pdf", "education").await;

    let link = share(&app, &token, json!({ "document_path": path })).await;
    assert!(link["expires_at"].is_null());
    assert_eq!(link["is_password_protected"], false);
    let share_token = share_token(&link);
    assert_eq!(
        link["url"],
        format!("{}/shared/{share_token}", helpers::BASE_URL)
    );

    let response = app
        .request("GET", &format!("/shared/{share_token}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "resolved");
    assert_eq!(response.body["data"]["display_name"], "Resume 2024");
    assert_eq!(response.body["data"]["category"], "education");

    let url = response.body["data"]["url"].as_str().unwrap();
    let (status, bytes) = app.fetch(url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"%PDF-1.7 test");

    let response = app.request("GET", "/api/shares", None, Some(&token)).await;
    assert_eq!(response.body["data"][0]["access_count"], 1);
}

#[tokio::test]
async fn test_password_share_is_locked_until_unlocked() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;

    let link = share(
        &app,
        &token,
        json!({ "document_path": path, "password": "hunter2", "expires_in_hours": 1 }),
    )
    .await;
    assert_eq!(link["is_password_protected"], true);
    assert!(link["expires_at"].is_string());
    let share_token = share_token(&link);

    let response = app
        .request("GET", &format!("/shared/{share_token}"), None, None)
        .await;
    assert_eq!(response.body["data"]["state"], "locked");
    assert!(response.body["data"]["url"].is_null());

    let response = app
        .request(
            "POST",
            &format!("/shared/{share_token}/unlock"),
            Some(json!({ "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "locked");
    assert_eq!(response.body["data"]["invalid_password"], true);

    let response = app
        .request(
            "POST",
            &format!("/shared/{share_token}/unlock"),
            Some(json!({ "password": "hunter2" })),
            None,
        )
        .await;
    assert_eq!(response.body["data"]["state"], "resolved");
    assert!(response.body["data"]["url"].is_string());
}

#[tokio::test]
async fn test_expired_share_never_resolves() {
    let app = TestApp::new();
    let (user, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;

    let hash = PasswordHasher::new().hash_password("secret").unwrap();
    app.share_store
        .create(&CreateDocumentShare {
            user_id: user,
            document_path: path,
            share_token: "expired-token".to_string(),
            is_public: true,
            expires_at: Some(Utc::now() - Duration::minutes(5)),
            password_hash: Some(hash),
            allow_download: true,
        })
        .await
        .unwrap();

    let response = app
        .request(
            "POST",
            "/shared/expired-token/unlock",
            Some(json!({ "password": "secret" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "expired");
    assert!(response.body["data"]["url"].is_null());
}

#[tokio::test]
async fn test_non_public_share_is_reported() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;

    let link = share(
        &app,
        &token,
        json!({ "document_path": path, "is_public": false }),
    )
    .await;

    let response = app
        .request("GET", &format!("/shared/{}", share_token(&link)), None, None)
        .await;
    assert_eq!(response.body["data"]["state"], "not_public");
}

#[tokio::test]
async fn test_unknown_token_is_not_found_state() {
    let app = TestApp::new();

    let response = app.request("GET", "/shared/does-not-exist", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "not_found");
}

#[tokio::test]
async fn test_trashed_document_share_is_unavailable() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;
    let link = share(&app, &token, json!({ "document_path": path })).await;

    let response = app
        .request("POST", "/api/trash", Some(json!({ "path": path })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request("GET", &format!("/shared/{}", share_token(&link)), None, None)
        .await;
    assert_eq!(response.body["data"]["state"], "unavailable");

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({ "document_path": path })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_private_document_cannot_be_shared() {
    let app = TestApp::new();
    let (user, token) = app.new_user();
    let grant = app.private_grant(&token).await;

    let response = app
        .upload(&token, "scan.png", "medical", true, b"png", Some(&grant))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let path = response.body["data"]["path"].as_str().unwrap().to_string();

    let response = app
        .request_with(
            "POST",
            "/api/shares",
            Some(json!({ "document_path": path })),
            Some(&token),
            Some(&grant),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.share_store.list_for_user(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_share_validation_and_ownership() {
    let app = TestApp::new();
    let (_, alice) = app.new_user();
    let (_, bob) = app.new_user();
    let path = app.upload_ok(&alice, "lease.pdf", "property").await;

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({ "document_path": path, "expires_in_hours": -1 })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({ "document_path": path })),
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let missing = format!("{}/1_legal_missing.pdf", UserId::new());
    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({ "document_path": missing })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expiry_is_capped() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;

    let before = Utc::now();
    let link = share(
        &app,
        &token,
        json!({ "document_path": path, "expires_in_hours": 10_000 }),
    )
    .await;

    let expires_at: chrono::DateTime<Utc> =
        serde_json::from_value(link["expires_at"].clone()).unwrap();
    assert!(expires_at <= Utc::now() + Duration::hours(48));
    assert!(expires_at >= before + Duration::hours(47));
}

#[tokio::test]
async fn test_deleted_share_stops_resolving() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;
    let link = share(&app, &token, json!({ "document_path": path })).await;
    let id = link["share_id"].as_str().unwrap();

    let response = app
        .request("DELETE", &format!("/api/shares/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/shared/{}", share_token(&link)), None, None)
        .await;
    assert_eq!(response.body["data"]["state"], "not_found");

    let response = app
        .request("DELETE", &format!("/api/shares/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
