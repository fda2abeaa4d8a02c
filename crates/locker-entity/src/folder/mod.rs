//! Smart folder domain entities.

pub mod model;

pub use model::{CreateSmartFolder, FolderAssignment, SmartFolder, UpdateSmartFolder};
