//! # locker-auth
//!
//! Authentication for the document locker.
//!
//! ## Modules
//!
//! - `jwt`: bearer token validation and private-access token issuance
//! - `password`: Argon2id hashing for share-link passwords
//! - `biometric`: the device biometric verification seam
//! - `private_access`: the gate that turns a verified assertion into a
//!   short-lived grant and validates it on later requests

pub mod biometric;
pub mod jwt;
pub mod password;
pub mod private_access;

pub use biometric::{BiometricAssertion, BiometricVerifier, build_verifier};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenType};
pub use password::PasswordHasher;
pub use private_access::{IssuedGrant, PrivateAccessGate, PrivateAccessGrant};
