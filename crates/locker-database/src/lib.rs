//! # locker-database
//!
//! Metadata store for the document locker: deletion markers, shares and
//! smart folders. Services depend on the async store traits in [`store`];
//! [`repositories`] implements them over PostgreSQL and [`memory`] over
//! process memory for tests and single-node development.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{FolderStore, ShareStore, TrashStore};
