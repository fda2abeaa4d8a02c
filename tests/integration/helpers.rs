//! Shared test helpers for integration tests.
//!
//! The application runs over in-memory metadata stores and the in-memory
//! storage provider, so no external services are needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use locker_api::{AppState, Stores, build_app};
use locker_auth::JwtEncoder;
use locker_categorizer::HeuristicCategorizer;
use locker_core::config::{AppConfig, BiometricMode, StorageProviderKind};
use locker_core::traits::storage::StorageProvider;
use locker_core::types::UserId;
use locker_database::memory::{MemoryFolderStore, MemoryShareStore, MemoryTrashStore};
use locker_storage::UrlSigner;
use locker_storage::providers::memory::MemoryStorageProvider;

/// Base URL the test app believes it is served from.
pub const BASE_URL: &str = "http://locker.test";

const BOUNDARY: &str = "locker-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Object storage behind the router
    pub storage: Arc<MemoryStorageProvider>,
    /// Deletion markers behind the router
    pub trash_store: Arc<MemoryTrashStore>,
    /// Share rows behind the router
    pub share_store: Arc<MemoryShareStore>,
    /// Application config
    pub config: AppConfig,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.server.public_base_url = BASE_URL.to_string();
        config.auth.jwt_secret = "integration-secret".to_string();
        config.auth.biometric_mode = BiometricMode::TrustDevice;
        config.storage.provider = StorageProviderKind::Memory;
        config.storage.max_upload_size_bytes = 64 * 1024;
        config.storage.url_signing_secret = "integration-signing".to_string();
        config.categorizer.pacing_ms = 0;
        config.sharing.max_expiry_hours = 48;

        let storage = Arc::new(MemoryStorageProvider::new(UrlSigner::new(
            &config.storage.url_signing_secret,
            config.server.base_url(),
        )));
        let trash_store = Arc::new(MemoryTrashStore::new());
        let share_store = Arc::new(MemoryShareStore::new());
        let folder_store = Arc::new(MemoryFolderStore::new());

        let state = AppState::new(
            config.clone(),
            Stores {
                trash: trash_store.clone(),
                shares: share_store.clone(),
                folders: folder_store,
            },
            storage.clone(),
            Arc::new(HeuristicCategorizer::new()),
        );

        Self {
            router: build_app(state),
            storage,
            trash_store,
            share_store,
            encoder: JwtEncoder::new(&config.auth),
            config,
        }
    }

    /// Issue a bearer token for `user`
    pub fn token_for(&self, user: UserId) -> String {
        self.encoder
            .issue_access_token(user, Some("owner@locker.test"), chrono::Duration::hours(1))
            .expect("Failed to issue token")
    }

    /// A fresh user with a bearer token
    pub fn new_user(&self) -> (UserId, String) {
        let user = UserId::new();
        (user, self.token_for(user))
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with(method, path, body, token, None).await
    }

    /// Make an HTTP request carrying a private-access grant
    pub async fn request_with(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        private_access: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(grant) = private_access {
            req = req.header("X-Private-Access", grant);
        }

        let req = match body {
            Some(body) => req
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&body).expect("Failed to serialize body"),
                )),
            None => req.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a document through the multipart endpoint
    pub async fn upload(
        &self,
        token: &str,
        file_name: &str,
        category: &str,
        is_private: bool,
        data: &[u8],
        private_access: Option<&str>,
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in [
            ("category", category.to_string()),
            ("is_private", is_private.to_string()),
        ] {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut req = Request::builder()
            .method("POST")
            .uri("/api/documents")
            .header("Authorization", format!("Bearer {}", token))
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(grant) = private_access {
            req = req.header("X-Private-Access", grant);
        }
        let req = req.body(Body::from(body)).expect("Failed to build request");

        self.send(req).await
    }

    /// Upload and return the stored object key
    pub async fn upload_ok(&self, token: &str, file_name: &str, category: &str) -> String {
        let response = self
            .upload(token, file_name, category, false, b"%PDF-1.7 test", None)
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Upload failed: {:?}",
            response.body
        );
        response.body["data"]["path"]
            .as_str()
            .expect("No path in upload response")
            .to_string()
    }

    /// Obtain a private-access grant for the bearer of `token`
    pub async fn private_grant(&self, token: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/private-access",
                Some(serde_json::json!({ "assertion": "face-id-ok", "device_id": "test-phone" })),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Private access failed: {:?}",
            response.body
        );
        response.body["data"]["token"]
            .as_str()
            .expect("No grant token")
            .to_string()
    }

    /// Whether an object exists in storage
    pub async fn object_exists(&self, key: &str) -> bool {
        self.storage.exists(key).await.expect("Storage exists failed")
    }

    /// Fetch a URL handed out by the app (signed object or share link)
    pub async fn fetch(&self, url: &str) -> (StatusCode, Vec<u8>) {
        let path = url.strip_prefix(BASE_URL).unwrap_or(url);
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        (status, bytes.to_vec())
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Percent-encode a value for use in a query string
pub fn query(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
