//! Credential verification interface.

use super::{AuthError, Identity};

/// Validates an opaque identity token presented at connection time.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}
