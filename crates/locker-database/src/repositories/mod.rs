//! PostgreSQL implementations of the metadata store traits.

pub mod folder;
pub mod share;
pub mod trash;

pub use folder::FolderRepository;
pub use share::ShareRepository;
pub use trash::TrashRepository;
