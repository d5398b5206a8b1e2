//! Typed server configuration.
//!
//! The binary parses command-line flags (with environment fallbacks) and
//! converts them into a [`ServerConfig`] here, so that invalid values are
//! reported once at startup.

use std::{fmt, time::Duration};

use thiserror::Error;

/// Configuration errors detected at startup
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("invalid {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally visible base URL used when handing out relay URLs
    pub public_base_url: Option<String>,
    pub origin: OriginConfig,
    pub auth: AuthConfig,
}

/// Upstream media origin access
#[derive(Clone)]
pub struct OriginConfig {
    base_url: String,
    api_key: String,
    user_id: String,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
}

impl OriginConfig {
    /// Default connect timeout for origin requests
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default time to wait for origin response headers
    pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: &str, api_key: &str, user_id: &str) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url("origin URL", base_url)?;
        if api_key.is_empty() {
            return Err(ConfigError::Empty("origin API key"));
        }
        if user_id.is_empty() {
            return Err(ConfigError::Empty("origin user id"));
        }
        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            user_id: user_id.to_string(),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            response_timeout: Self::DEFAULT_RESPONSE_TIMEOUT,
        })
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, response_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.response_timeout = response_timeout;
        self
    }

    /// Origin base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl fmt::Debug for OriginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("connect_timeout", &self.connect_timeout)
            .field("response_timeout", &self.response_timeout)
            .finish()
    }
}

/// Identity token verification
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: &str) -> Result<Self, ConfigError> {
        if jwt_secret.is_empty() {
            return Err(ConfigError::Empty("JWT secret"));
        }
        Ok(Self {
            jwt_secret: jwt_secret.to_string(),
        })
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

/// Validate an absolute http(s) URL and strip its trailing slash.
pub fn normalize_base_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = reqwest::Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}
