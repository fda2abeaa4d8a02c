//! Trash: deletion markers over untouched objects.

pub mod service;

pub use service::{PurgeSummary, TrashService};
