//! Integration tests for biometric-gated private documents.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::{TestApp, query};

#[tokio::test]
async fn test_private_upload_requires_grant() {
    let app = TestApp::new();
    let (_, token) = app.new_user();

    let response = app
        .upload(&token, "scan.png", "medical", true, b"png", None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let grant = app.private_grant(&token).await;
    let response = app
        .upload(&token, "scan.png", "medical", true, b"png", Some(&grant))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let path = response.body["data"]["path"].as_str().unwrap();
    assert!(path.contains("/private/"));
    assert_eq!(response.body["data"]["category"], "private");
    assert_eq!(response.body["data"]["is_private"], true);
    assert!(app.object_exists(path).await);
}

#[tokio::test]
async fn test_private_entries_only_get_urls_with_grant() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let grant = app.private_grant(&token).await;
    app.upload(&token, "scan.png", "medical", true, b"png", Some(&grant))
        .await;
    app.upload_ok(&token, "lease.pdf", "property").await;

    let response = app.request("GET", "/api/documents", None, Some(&token)).await;
    let documents = response.body["data"].as_array().unwrap();
    assert_eq!(documents.len(), 2);
    let private = documents
        .iter()
        .find(|d| d["is_private"] == true)
        .expect("private entry listed");
    assert!(private["url"].is_null());

    let response = app
        .request_with("GET", "/api/documents", None, Some(&token), Some(&grant))
        .await;
    let documents = response.body["data"].as_array().unwrap();
    let private = documents.iter().find(|d| d["is_private"] == true).unwrap();
    let url = private["url"].as_str().expect("unlocked entry has a url");

    let (status, bytes) = app.fetch(url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"png");
}

#[tokio::test]
async fn test_grant_is_bound_to_its_user() {
    let app = TestApp::new();
    let (_, alice) = app.new_user();
    let (_, bob) = app.new_user();
    let grant = app.private_grant(&alice).await;

    let response = app
        .request_with("GET", "/api/documents", None, Some(&bob), Some(&grant))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_garbage_grant_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app.new_user();

    let response = app
        .request_with("GET", "/api/documents", None, Some(&token), Some("not-a-grant"))
        .await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_empty_assertion_is_refused() {
    let app = TestApp::new();
    let (_, token) = app.new_user();

    let response = app
        .request(
            "POST",
            "/api/auth/private-access",
            Some(json!({ "assertion": "" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_private_delete_is_immediate() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let grant = app.private_grant(&token).await;
    let response = app
        .upload(&token, "scan.png", "medical", true, b"png", Some(&grant))
        .await;
    let path = response.body["data"]["path"].as_str().unwrap().to_string();

    let response = app
        .request(
            "DELETE",
            &format!("/api/documents?path={}", query(&path)),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.object_exists(&path).await);

    let response = app
        .request_with(
            "DELETE",
            &format!("/api/documents?path={}", query(&path)),
            None,
            Some(&token),
            Some(&grant),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["kind"], "removed");
    assert!(!app.object_exists(&path).await);

    let response = app.request("GET", "/api/trash", None, Some(&token)).await;
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_private_documents_cannot_be_trashed_or_recategorized() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let grant = app.private_grant(&token).await;
    let response = app
        .upload(&token, "scan.png", "medical", true, b"png", Some(&grant))
        .await;
    let path = response.body["data"]["path"].as_str().unwrap().to_string();

    let response = app
        .request_with(
            "POST",
            "/api/trash",
            Some(json!({ "path": path })),
            Some(&token),
            Some(&grant),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request_with(
            "PUT",
            "/api/documents/category",
            Some(json!({ "path": path, "category": "medical" })),
            Some(&token),
            Some(&grant),
        )
        .await;
    assert!(response.status.is_client_error());
    assert!(app.object_exists(&path).await);
}

#[tokio::test]
async fn test_private_documents_are_skipped_by_bulk_categorization() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let grant = app.private_grant(&token).await;
    app.upload(
        &token,
        "bank_statement_invoice.pdf",
        "other",
        true,
        b"pdf",
        Some(&grant),
    )
    .await;

    let response = app
        .request_with("POST", "/api/categorize/bulk", None, Some(&token), Some(&grant))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["applied"], json!([]));
    assert_eq!(response.body["data"]["pending"], json!([]));
}
