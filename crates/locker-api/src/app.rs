//! Application builder: wires router + middleware + state into an Axum app.

use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::trace::TraceLayer;

use locker_categorizer::build_categorizer;
use locker_core::config::AppConfig;
use locker_core::error::AppError;
use locker_core::result::AppResult;
use locker_database::DatabasePool;
use locker_database::repositories::{FolderRepository, ShareRepository, TrashRepository};
use locker_storage::build_provider;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::{AppState, Stores};

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

/// Runs the document locker server with the given configuration.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting document locker v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        db.migrate().await?;
        tracing::info!("Database migrations complete");
    }

    // ── Step 2: Metadata stores ──────────────────────────────────
    let stores = Stores {
        trash: Arc::new(TrashRepository::new(db.pool().clone())),
        shares: Arc::new(ShareRepository::new(db.pool().clone())),
        folders: Arc::new(FolderRepository::new(db.pool().clone())),
    };

    // ── Step 3: Object storage ───────────────────────────────────
    let storage = build_provider(&config.storage, config.server.base_url()).await?;

    // ── Step 4: Categorizer ──────────────────────────────────────
    let categorizer = build_categorizer(&config.categorizer)?;

    // ── Step 5: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(AppState::new(config, stores, storage, categorizer));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Document locker listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
