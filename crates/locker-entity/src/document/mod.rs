//! Document domain entities.

pub mod model;
pub mod path;

pub use model::DocumentEntry;
pub use path::{DocumentPath, sanitize_file_name};
