//! JWT credential verifier.
//!
//! Tokens are HS256 JWTs whose claims are `{userId, username, iat, exp}`,
//! the shape issued by the account service at login.

use std::fmt;

use chrono::Duration;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, CredentialVerifier, Identity};
use synccinema_shared::time::current_timestamp_secs;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub username: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Verifies (and, for tooling and tests, issues) identity tokens
#[derive(Clone)]
pub struct JwtCredentialVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtCredentialVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtCredentialVerifier")
            .field("algorithm", &Algorithm::HS256)
            .finish()
    }
}

impl JwtCredentialVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // expiry is exact; tokens are short-lived and issued by the same deployment
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `identity` that expires after `ttl`
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String, AuthError> {
        let now = current_timestamp_secs();
        self.issue_with_expiry(identity, now, now + ttl.num_seconds())
    }

    /// Sign a token with explicit `iat` / `exp` claims
    pub fn issue_with_expiry(
        &self,
        identity: &Identity,
        issued_at: i64,
        expires_at: i64,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            iat: issued_at,
            exp: expires_at,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Issue(e.to_string()))
    }
}

impl CredentialVerifier for JwtCredentialVerifier {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid(e.to_string()),
            }
        })?;

        Ok(Identity {
            user_id: data.claims.user_id,
            username: data.claims.username,
        })
    }
}
