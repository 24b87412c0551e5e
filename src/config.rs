//! Client configuration.

use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.snapapi.dev";
/// Whole round-trip timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Immutable settings shared by every request a client makes.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Validate and normalize settings. Trailing slashes are stripped from
    /// the base URL so that `base_url + path` never doubles them.
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::validation("API key is required"));
        }
        if timeout.is_zero() {
            return Err(Error::validation("Timeout must be greater than zero"));
        }

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
