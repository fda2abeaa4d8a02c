//! Integration tests for trash, restore, permanent delete, and purge.

mod helpers;

use http::StatusCode;
use serde_json::json;

use locker_database::ShareStore;

use helpers::{TestApp, query};

async fn trash(app: &TestApp, token: &str, path: &str) -> String {
    let response = app
        .request("POST", "/api/trash", Some(json!({ "path": path })), Some(token))
        .await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "Trash failed: {:?}",
        response.body
    );
    response.body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_trash_then_restore() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "Resume_2024.pdf", "education").await;

    let marker = trash(&app, &token, &path).await;

    let response = app.request("GET", "/api/trash", None, Some(&token)).await;
    let trashed = response.body["data"].as_array().unwrap();
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0]["display_name"], "Resume 2024");
    assert_eq!(trashed[0]["category"], "education");
    assert_eq!(trashed[0]["available"], true);

    let response = app
        .request(
            "POST",
            &format!("/api/trash/{marker}/restore"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/trash", None, Some(&token)).await;
    assert_eq!(response.body["data"], json!([]));

    let response = app.request("GET", "/api/documents", None, Some(&token)).await;
    let documents = response.body["data"].as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["path"], path.as_str());
}

#[tokio::test]
async fn test_trashing_twice_conflicts() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;

    trash(&app, &token, &path).await;

    let response = app
        .request("POST", "/api/trash", Some(json!({ "path": path })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_trashed_document_has_no_url() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;
    trash(&app, &token, &path).await;

    let response = app
        .request(
            "GET",
            &format!("/api/documents/url?path={}", query(&path)),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_permanent_delete_removes_object_and_shares() {
    let app = TestApp::new();
    let (user, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;

    let response = app
        .request(
            "POST",
            "/api/shares",
            Some(json!({ "document_path": path })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let marker = trash(&app, &token, &path).await;

    let response = app
        .request("DELETE", &format!("/api/trash/{marker}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("advisories").is_none());
    assert!(!app.object_exists(&path).await);

    let response = app.request("GET", "/api/trash", None, Some(&token)).await;
    assert_eq!(response.body["data"], json!([]));

    assert!(app.share_store.list_for_user(user).await.unwrap().is_empty());

    let response = app
        .request("DELETE", &format!("/api/trash/{marker}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_users_cannot_touch_markers() {
    let app = TestApp::new();
    let (_, alice) = app.new_user();
    let (_, mallory) = app.new_user();
    let path = app.upload_ok(&alice, "lease.pdf", "property").await;
    let marker = trash(&app, &alice, &path).await;

    let response = app
        .request("DELETE", &format!("/api/trash/{marker}"), None, Some(&mallory))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "POST",
            &format!("/api/trash/{marker}/restore"),
            None,
            Some(&mallory),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.object_exists(&path).await);
}

#[tokio::test]
async fn test_purge_with_zero_days_empties_trash() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let first = app.upload_ok(&token, "lease.pdf", "property").await;
    let second = app.upload_ok(&token, "ticket.pdf", "travel").await;
    let kept = app.upload_ok(&token, "passport.pdf", "identity").await;

    trash(&app, &token, &first).await;
    trash(&app, &token, &second).await;

    let response = app
        .request(
            "POST",
            "/api/trash/purge",
            Some(json!({ "days": 0 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["purged"], 2);
    assert_eq!(response.body["data"]["objects_removed"], 2);

    assert!(!app.object_exists(&first).await);
    assert!(!app.object_exists(&second).await);
    assert!(app.object_exists(&kept).await);

    let response = app.request("GET", "/api/trash", None, Some(&token)).await;
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_purge_with_default_retention_keeps_recent() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;
    trash(&app, &token, &path).await;

    let response = app
        .request("POST", "/api/trash/purge", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["purged"], 0);
    assert!(app.object_exists(&path).await);
}
