//! Share domain entities.

pub mod access;
pub mod link;
pub mod model;

pub use access::{ShareState, SharedDocumentView};
pub use link::ShareLink;
pub use model::{CreateDocumentShare, DocumentShare};
