//! Client configuration: which API origin to talk to and the App-Token
//! credentials used by `HmacSigner`.
//!
//! Both types deserialize with serde so applications can embed them in their
//! own configuration files.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const PRODUCTION_BASE_URL: &str = "https://api.sumsub.com";
pub const STAGING_BASE_URL: &str = "https://test-api.sumsub.com";

/// API origin the client is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    #[default]
    Production,
    Staging,
    /// Any other origin, e.g. a proxy or a local mock server.
    Custom(String),
}

impl Endpoint {
    pub fn as_str(&self) -> &str {
        match self {
            Endpoint::Production => PRODUCTION_BASE_URL,
            Endpoint::Staging => STAGING_BASE_URL,
            Endpoint::Custom(url) => url,
        }
    }

    /// Parses the origin. Rejects URLs that cannot take path segments.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.as_str();
        let url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeABase(raw.to_string()));
        }
        Ok(url)
    }
}

/// App token and secret issued by the service dashboard.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub app_token: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(app_token: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            app_token: app_token.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_token", &self.app_token)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
