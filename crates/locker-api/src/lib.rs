//! # locker-api
//!
//! HTTP API layer for the document locker built on Axum.
//!
//! Provides the authenticated REST endpoints, the public share and signed
//! object endpoints, middleware (CORS, logging, compression), extractors,
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::{AppState, Stores};
