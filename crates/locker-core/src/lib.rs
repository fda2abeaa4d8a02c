//! # locker-core
//!
//! Core crate for the document locker. Contains the storage provider
//! trait, configuration schemas, typed identifiers, the best-effort
//! [`Outcome`](types::Outcome) wrapper, and the unified error system.
//!
//! This crate has **no** internal dependencies on other locker crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
