//! Configuration types for the hosting.de DNS client
//!
//! This module defines the long-lived connection settings shared by every call.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default hosting.de API endpoint
pub const DEFAULT_BASE_URL: &str = "https://secure.hosting.de";

/// Client configuration
///
/// # Security
///
/// The Debug implementation does NOT expose the auth token.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// hosting.de API auth token
    /// ⚠️ NEVER log this value
    pub auth_token: String,

    /// Base URL the API paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Retries on top of the first attempt when the target object is locked
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Delay between object-locked retries (in seconds)
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// TTL for new records when neither the caller nor a previous record supplies one
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// Page size for zone queries
    #[serde(default = "default_zone_query_limit")]
    pub zone_query_limit: u32,

    /// Page size for record queries
    #[serde(default = "default_record_query_limit")]
    pub record_query_limit: u32,

    /// HTTP request timeout (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

// Custom Debug implementation that hides the auth token
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("auth_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("default_ttl", &self.default_ttl)
            .field("zone_query_limit", &self.zone_query_limit)
            .field("record_query_limit", &self.record_query_limit)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration with defaults for everything but the token
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            default_ttl: default_ttl(),
            zone_query_limit: default_zone_query_limit(),
            record_query_limit: default_record_query_limit(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the object-locked retry budget and delay
    pub fn with_retries(mut self, max_retries: usize, retry_delay_secs: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_delay_secs = retry_delay_secs;
        self
    }

    /// Set the fallback TTL
    pub fn with_default_ttl(mut self, ttl: u32) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.auth_token.trim().is_empty() {
            return Err(crate::Error::config("hosting.de auth token cannot be empty"));
        }

        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }

        if self.zone_query_limit == 0 || self.record_query_limit == 0 {
            return Err(crate::Error::config("Query limits must be > 0"));
        }

        if self.http_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }

        Ok(())
    }

    /// Retry policy derived from this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }

    /// HTTP timeout as a [`Duration`]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Bounded fixed-delay retry policy for object-locked responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries on top of the first attempt
    pub max_retries: usize,
    /// Fixed delay before each retry
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Create a retry policy
    pub fn new(max_retries: usize, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// A policy that never retries
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            default_max_retries(),
            Duration::from_secs(default_retry_delay_secs()),
        )
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_delay_secs() -> u64 {
    2
}

fn default_ttl() -> u32 {
    8400
}

fn default_zone_query_limit() -> u32 {
    25
}

fn default_record_query_limit() -> u32 {
    50
}

fn default_http_timeout_secs() -> u64 {
    30
}
