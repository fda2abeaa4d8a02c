//! Integration tests for document listing, upload, and categorization.

mod helpers;

use http::StatusCode;
use serde_json::json;

use locker_core::traits::storage::StorageProvider;

use helpers::{TestApp, query};

#[tokio::test]
async fn test_documents_require_authentication() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/documents", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_upload_then_list() {
    let app = TestApp::new();
    let (user, token) = app.new_user();

    let path = app.upload_ok(&token, "Resume_2024.pdf", "education").await;
    assert!(path.starts_with(&format!("{user}/")));
    assert!(path.ends_with("_education_Resume_2024.pdf"));
    assert!(app.object_exists(&path).await);

    let response = app.request("GET", "/api/documents", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let documents = response.body["data"].as_array().expect("data is an array");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["display_name"], "Resume 2024");
    assert_eq!(documents[0]["category"], "education");
    assert_eq!(documents[0]["is_private"], false);

    let url = documents[0]["url"].as_str().expect("listing carries a url");
    let (status, bytes) = app.fetch(url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"%PDF-1.7 test");
}

#[tokio::test]
async fn test_listing_is_scoped_to_the_caller() {
    let app = TestApp::new();
    let (_, alice) = app.new_user();
    let (_, bob) = app.new_user();

    app.upload_ok(&alice, "lease.pdf", "property").await;

    let response = app.request("GET", "/api/documents", None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app.new_user();

    let response = app.upload(&token, "empty.pdf", "other", false, b"", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unusable_categories_are_rejected() {
    let app = TestApp::new();
    let (user, token) = app.new_user();

    let response = app
        .upload(&token, "lease.pdf", "tax/2024", false, b"pdf", None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .upload(&token, "passport.pdf", "private", false, b"pdf", None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let listed = app.storage.list(&user.to_string()).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = TestApp::new();
    let (user, token) = app.new_user();

    let data = vec![b'x'; 70 * 1024];
    let response = app.upload(&token, "big.pdf", "other", false, &data, None).await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);

    let listed = app.storage.list(&user.to_string()).await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_document_url_for_someone_elses_path_is_forbidden() {
    let app = TestApp::new();
    let (_, alice) = app.new_user();
    let (_, bob) = app.new_user();

    let path = app.upload_ok(&alice, "lease.pdf", "property").await;

    let response = app
        .request(
            "GET",
            &format!("/api/documents/url?path={}", query(&path)),
            None,
            Some(&bob),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "GET",
            &format!("/api/documents/url?path={}", query(&path)),
            None,
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["path"], path.as_str());
}

#[tokio::test]
async fn test_tampered_signed_url_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    app.upload_ok(&token, "lease.pdf", "property").await;

    let response = app.request("GET", "/api/documents", None, Some(&token)).await;
    let url = response.body["data"][0]["url"].as_str().unwrap().to_string();
    let tampered = url.replace("signature=", "signature=00");

    let (status, _) = app.fetch(&tampered).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_recategorize_moves_the_object() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "scan.pdf", "other").await;

    let response = app
        .request(
            "PUT",
            "/api/documents/category",
            Some(json!({ "path": path, "category": "medical" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let moved = response.body["data"]["path"].as_str().unwrap().to_string();
    assert!(moved.ends_with("_medical_scan.pdf"));
    assert!(app.object_exists(&moved).await);
    assert!(!app.object_exists(&path).await);

    let response = app.request("GET", "/api/documents", None, Some(&token)).await;
    assert_eq!(response.body["data"][0]["category"], "medical");
}

#[tokio::test]
async fn test_delete_moves_public_document_to_trash() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/documents?path={}", query(&path)),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["kind"], "trashed");

    let response = app.request("GET", "/api/documents", None, Some(&token)).await;
    assert_eq!(response.body["data"], json!([]));

    let response = app.request("GET", "/api/trash", None, Some(&token)).await;
    let trashed = response.body["data"].as_array().unwrap();
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0]["document_path"], path.as_str());
    assert!(app.object_exists(&path).await);
}

#[tokio::test]
async fn test_suggest_and_bulk_categorize() {
    let app = TestApp::new();
    let (_, token) = app.new_user();

    let response = app
        .request(
            "POST",
            "/api/categorize/suggest",
            Some(json!({ "filename": "bank_statement_march.pdf" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["category"], "financial");
    assert_eq!(response.body["data"]["source"], "heuristic");

    app.upload_ok(&token, "bank_statement_invoice.pdf", "other").await;
    app.upload_ok(&token, "notes.pdf", "other").await;

    let response = app
        .request("POST", "/api/categorize/bulk", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["applied"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["data"]["pending"].as_array().unwrap().len(), 1);

    let response = app.request("GET", "/api/documents", None, Some(&token)).await;
    let categories: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["category"].as_str().unwrap())
        .collect();
    assert!(categories.contains(&"financial"));
    assert!(categories.contains(&"other"));
}

#[tokio::test]
async fn test_health_reports_storage() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["storage_provider"], "memory");
}
