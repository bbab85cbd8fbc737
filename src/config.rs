//! Client configuration.
//!
//! [`ClientConfig`] captures everything the client needs at construction
//! time: the base URL, the shared credential pair, and the transport
//! settings (timeout, retry policy, extra headers). The configuration is
//! fixed once the client is built.
//!
//! Configuration can be assembled in code via [`ClientConfig::new`] and the
//! `with_*` methods, or loaded from a TOML file with environment overrides
//! via [`ClientConfig::from_file`].

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ClientError;

/// Constructor-time configuration for [`S2sClient`](crate::client::S2sClient).
///
/// All retry settings apply only to idempotent GET requests; see the
/// transport layer for the exact policy.
///
/// # Example
///
/// ```rust,no_run
/// use basaltpass_s2s::ClientConfig;
///
/// let config = ClientConfig::new("https://id.example.com", "svc-billing", "s3cret")
///     .with_timeout_secs(5)
///     .with_max_retries(3);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the BasaltPass deployment. Trailing slashes are stripped.
    pub base_url: String,
    /// Client identifier, sent as the `client_id` header on every request.
    pub client_id: String,
    /// Client secret, sent as the `client_secret` header on every request.
    pub client_secret: String,
    /// Per-attempt request timeout in seconds (default 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum retry attempts for transient GET failures, on top of the
    /// initial attempt (default 2). Zero disables retries.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Seed for the exponential backoff between retries, in seconds
    /// (default 0.2). Must be finite, non-negative, and no more than 30;
    /// client construction rejects anything else.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    /// HTTP status codes eligible for retry (default 500, 502, 503, 504).
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,
    /// Extra static headers sent on every request. These may override the
    /// values of the mandatory `client_id`/`client_secret`/`Accept` headers
    /// but can never remove them.
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_factor() -> f64 {
    0.2
}

fn default_retry_statuses() -> Vec<u16> {
    vec![500, 502, 503, 504]
}

impl ClientConfig {
    /// Creates a configuration with default transport settings.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
            retry_statuses: default_retry_statuses(),
            extra_headers: HashMap::new(),
        }
    }

    /// Loads configuration from a TOML file, then applies `BASALTPASS_`
    /// prefixed environment variable overrides (e.g. `BASALTPASS_CLIENT_SECRET`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the file cannot be read or the
    /// merged configuration is missing a required field.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let cfg = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("BASALTPASS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Sets the per-attempt request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the maximum number of retry attempts for transient GET failures.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the exponential backoff seed in seconds.
    #[must_use]
    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Replaces the set of HTTP status codes eligible for retry.
    #[must_use]
    pub fn with_retry_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_statuses = statuses.into();
        self
    }

    /// Adds an extra static header sent on every request.
    #[must_use]
    pub fn with_extra_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// The per-attempt timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
