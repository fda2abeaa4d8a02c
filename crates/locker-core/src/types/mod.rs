//! Core type definitions used across the locker workspace.

pub mod id;
pub mod outcome;

pub use id::*;
pub use outcome::{Advisory, Outcome};
