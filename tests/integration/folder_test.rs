//! Integration tests for smart folders, assignments, and auto-assignment.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::{TestApp, query};

async fn create_folder(app: &TestApp, token: &str, body: serde_json::Value) -> String {
    let response = app.request("POST", "/api/folders", Some(body), Some(token)).await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "Folder create failed: {:?}",
        response.body
    );
    response.body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_folder_crud() {
    let app = TestApp::new();
    let (_, token) = app.new_user();

    let id = create_folder(
        &app,
        &token,
        json!({ "name": "Taxes", "description": "Yearly returns", "keywords": ["tax", " W2 "] }),
    )
    .await;

    let response = app.request("GET", "/api/folders", None, Some(&token)).await;
    let folders = response.body["data"].as_array().unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0]["folder_name"], "Taxes");

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Taxes" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{id}"),
            Some(json!({ "name": "Tax Returns", "description": null })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["folder_name"], "Tax Returns");
    assert!(response.body["data"]["folder_description"].is_null());

    let response = app
        .request("DELETE", &format!("/api/folders/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("DELETE", &format!("/api/folders/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_folder_name_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app.new_user();

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "" })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_folders_are_private_to_their_owner() {
    let app = TestApp::new();
    let (_, alice) = app.new_user();
    let (_, bob) = app.new_user();
    let id = create_folder(&app, &alice, json!({ "name": "Medical" })).await;

    let response = app.request("GET", "/api/folders", None, Some(&bob)).await;
    assert_eq!(response.body["data"], json!([]));

    let response = app
        .request("DELETE", &format!("/api/folders/{id}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assign_list_and_unassign() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;
    let home = create_folder(&app, &token, json!({ "name": "Home" })).await;
    let archive = create_folder(&app, &token, json!({ "name": "Archive" })).await;

    let response = app
        .request(
            "PUT",
            "/api/folders/assignments",
            Some(json!({ "document_path": path, "folder_id": home })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "PUT",
            "/api/folders/assignments",
            Some(json!({ "document_path": path, "folder_id": archive })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/folders/assignments", None, Some(&token))
        .await;
    let assignments = response.body["data"].as_array().unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0]["folder_id"], archive.as_str());

    let response = app
        .request(
            "GET",
            &format!("/api/folders/assignments?folder_id={home}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.body["data"], json!([]));

    let response = app
        .request(
            "DELETE",
            &format!("/api/folders/assignments?path={}", query(&path)),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "DELETE",
            &format!("/api/folders/assignments?path={}", query(&path)),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assigning_trashed_document_conflicts() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;
    let folder = create_folder(&app, &token, json!({ "name": "Home" })).await;

    let response = app
        .request("POST", "/api/trash", Some(json!({ "path": path })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request(
            "PUT",
            "/api/folders/assignments",
            Some(json!({ "document_path": path, "folder_id": folder })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_deleting_folder_drops_assignments() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let path = app.upload_ok(&token, "lease.pdf", "property").await;
    let folder = create_folder(&app, &token, json!({ "name": "Home" })).await;

    app.request(
        "PUT",
        "/api/folders/assignments",
        Some(json!({ "document_path": path, "folder_id": folder })),
        Some(&token),
    )
    .await;

    let response = app
        .request("DELETE", &format!("/api/folders/{folder}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/folders/assignments", None, Some(&token))
        .await;
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_auto_assign_uses_and_creates_folders() {
    let app = TestApp::new();
    let (_, token) = app.new_user();
    let existing = create_folder(
        &app,
        &token,
        json!({ "name": "Trips", "keywords": ["boarding", "itinerary"] }),
    )
    .await;

    let pass = app.upload_ok(&token, "boarding_pass_itinerary.pdf", "travel").await;
    let statement = app
        .upload_ok(&token, "bank_statement_invoice.pdf", "financial")
        .await;
    let notes = app.upload_ok(&token, "notes.pdf", "other").await;

    let response = app
        .request("POST", "/api/folders/auto-assign", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let assigned = response.body["data"]["assigned"].as_array().unwrap();
    assert_eq!(assigned.len(), 2);

    let to_trips = assigned
        .iter()
        .find(|a| a["path"] == pass.as_str())
        .expect("boarding pass assigned");
    assert_eq!(to_trips["folder_id"], existing.as_str());
    assert_eq!(to_trips["created_folder"], false);

    let to_financial = assigned
        .iter()
        .find(|a| a["path"] == statement.as_str())
        .expect("statement assigned");
    assert_eq!(to_financial["folder_name"], "Financial");
    assert_eq!(to_financial["created_folder"], true);

    let pending = response.body["data"]["pending"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["path"], notes.as_str());

    let response = app.request("GET", "/api/folders", None, Some(&token)).await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 2);

    let response = app
        .request("POST", "/api/folders/auto-assign", None, Some(&token))
        .await;
    assert_eq!(response.body["data"]["assigned"], json!([]));
}
