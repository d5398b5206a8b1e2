//! Credential verifier implementations.
//!
//! - `jwt`: HS256 JSON Web Tokens signed with a shared secret

pub mod jwt;

pub use jwt::JwtCredentialVerifier;
