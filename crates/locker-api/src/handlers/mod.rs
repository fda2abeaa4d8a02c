//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod categorize;
pub mod document;
pub mod folder;
pub mod health;
pub mod object;
pub mod share;
pub mod trash;
