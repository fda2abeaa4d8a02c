//! Password hashing for password-protected share links.

pub mod hasher;

pub use hasher::PasswordHasher;
