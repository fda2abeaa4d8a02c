//! Smart folders and document assignments.

pub mod service;

pub use service::{CreateFolderRequest, FolderService, UpdateFolderRequest};
