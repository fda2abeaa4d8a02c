//! Trash domain entities.

pub mod model;

pub use model::{CreateDeletedDocument, DeletedDocument, TrashedDocument};
