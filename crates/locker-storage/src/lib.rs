//! # locker-storage
//!
//! Object storage providers for the document locker: local filesystem,
//! S3-compatible object stores, and process memory. All of them implement
//! [`locker_core::traits::StorageProvider`]; [`manager::build_provider`]
//! picks one from configuration.

pub mod manager;
pub mod mime;
pub mod providers;
pub mod signing;

pub use manager::build_provider;
pub use signing::UrlSigner;
