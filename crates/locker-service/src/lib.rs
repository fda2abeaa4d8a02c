//! # locker-service
//!
//! Business logic service layer for the document locker. Each service
//! orchestrates the metadata stores, the object store, and the auth
//! primitives to implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. They hold no mutable state
//! of their own.

pub mod categorize;
pub mod context;
pub mod document;
pub mod folder;
pub mod share;
pub mod trash;

#[cfg(test)]
pub(crate) mod testing;

pub use categorize::CategorizeService;
pub use context::RequestContext;
pub use document::DocumentService;
pub use folder::FolderService;
pub use share::{AccessService, LinkService, ShareService};
pub use trash::TrashService;
