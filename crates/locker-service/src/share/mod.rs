//! Share management: create, list and delete share links, and resolve
//! them for anonymous visitors.

pub mod access;
pub mod link;
pub mod service;

pub use access::AccessService;
pub use link::LinkService;
pub use service::{CreateShareRequest, ShareService};
