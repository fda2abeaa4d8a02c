//! # locker-entity
//!
//! Domain entity models for the document locker. Every struct in this
//! crate represents a database table row or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! database entities additionally derive `sqlx::FromRow`.
//!
//! Active documents have no row: their metadata is encoded in the object
//! key and decoded by [`document::DocumentPath`].

pub mod categorization;
pub mod category;
pub mod document;
pub mod folder;
pub mod share;
pub mod trash;

pub use category::Category;
pub use document::{DocumentEntry, DocumentPath};
