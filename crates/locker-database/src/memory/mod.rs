//! In-process implementations of the store traits.
//!
//! They enforce the same uniqueness rules as the PostgreSQL schema so
//! service tests observe the same conflicts.

pub mod folder;
pub mod share;
pub mod trash;

pub use folder::MemoryFolderStore;
pub use share::MemoryShareStore;
pub use trash::MemoryTrashStore;
