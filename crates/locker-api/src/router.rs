//! Route definitions for the document locker HTTP API.
//!
//! Authenticated routes are mounted under `/api`; share resolution and
//! signed object downloads are public and live at the root.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and the small text fields next to the file.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Build the route tree.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .storage
        .max_upload_size_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .merge(document_routes())
        .merge(trash_routes())
        .merge(share_routes())
        .merge(folder_routes())
        .merge(categorize_routes())
        .merge(auth_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Active documents
fn document_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents",
            get(handlers::document::list_documents)
                .post(handlers::document::upload_document)
                .delete(handlers::document::delete_document),
        )
        .route("/documents/url", get(handlers::document::document_url))
        .route(
            "/documents/category",
            put(handlers::document::recategorize_document),
        )
}

/// Trash
fn trash_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/trash",
            get(handlers::trash::list_trash).post(handlers::trash::move_to_trash),
        )
        .route("/trash/purge", post(handlers::trash::purge))
        .route("/trash/{id}", delete(handlers::trash::permanently_delete))
        .route("/trash/{id}/restore", post(handlers::trash::restore))
}

/// Share management
fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shares",
            get(handlers::share::list_shares).post(handlers::share::create_share),
        )
        .route("/shares/{id}", delete(handlers::share::delete_share))
}

/// Smart folders and assignments
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route(
            "/folders/assignments",
            get(handlers::folder::list_assignments)
                .put(handlers::folder::assign)
                .delete(handlers::folder::unassign),
        )
        .route(
            "/folders/auto-assign",
            post(handlers::categorize::auto_assign),
        )
        .route(
            "/folders/{id}",
            put(handlers::folder::update_folder).delete(handlers::folder::delete_folder),
        )
}

/// Categorization
fn categorize_routes() -> Router<AppState> {
    Router::new()
        .route("/categorize/suggest", post(handlers::categorize::suggest))
        .route("/categorize/bulk", post(handlers::categorize::bulk_categorize))
}

/// Private access
fn auth_routes() -> Router<AppState> {
    Router::new().route(
        "/auth/private-access",
        post(handlers::auth::private_access),
    )
}

/// Health
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Unauthenticated share resolution and signed downloads
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/shared/{token}", get(handlers::share::view_shared))
        .route("/shared/{token}/unlock", post(handlers::share::unlock_shared))
        .route("/objects/{*key}", get(handlers::object::download_object))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    use locker_categorizer::HeuristicCategorizer;
    use locker_core::config::AppConfig;
    use locker_database::memory::{MemoryFolderStore, MemoryShareStore, MemoryTrashStore};
    use locker_storage::UrlSigner;
    use locker_storage::providers::memory::MemoryStorageProvider;

    use super::*;
    use crate::state::Stores;

    fn router() -> Router {
        let config = AppConfig::default();
        let signer = UrlSigner::new(
            &config.storage.url_signing_secret,
            config.server.base_url(),
        );
        let state = AppState::new(
            config,
            Stores {
                trash: Arc::new(MemoryTrashStore::new()),
                shares: Arc::new(MemoryShareStore::new()),
                folders: Arc::new(MemoryFolderStore::new()),
            },
            Arc::new(MemoryStorageProvider::new(signer)),
            Arc::new(HeuristicCategorizer::new()),
        );
        build_router(state)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = router()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_documents_require_bearer_token() {
        let response = router()
            .oneshot(Request::get("/api/documents").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_share_token_reports_state() {
        let response = router()
            .oneshot(Request::get("/shared/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
