//! Tracker configuration.
//!
//! Built in code with the `with_*` setters or loaded from TOML:
//!
//! ```toml
//! base_url = "https://mautic.example.com/"
//! app_name = "Shop"
//! app_version = "2.1.0"
//! close_connection = false
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::TrackingError;
use crate::http::Scheme;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerConfig {
    /// Base endpoint; normalized to a bare host before use.
    pub base_url: String,
    #[serde(default)]
    pub scheme: Scheme,
    /// Sent as `userid` on every request when set.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub app_version: Option<String>,
    /// Sent as `page_referrer` on every request when set.
    #[serde(default)]
    pub app_bundle_name: Option<String>,
    /// Ask the server to close the connection after each request.
    #[serde(default = "default_close_connection")]
    pub close_connection: bool,
    /// Per-request timeout for the bundled transport. No timeout when unset.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_close_connection() -> bool {
    true
}

impl TrackerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            scheme: Scheme::default(),
            user_id: None,
            app_name: None,
            app_version: None,
            app_bundle_name: None,
            close_connection: default_close_connection(),
            timeout_ms: None,
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, TrackingError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = Some(app_version.into());
        self
    }

    pub fn with_app_bundle_name(mut self, bundle: impl Into<String>) -> Self {
        self.app_bundle_name = Some(bundle.into());
        self
    }

    pub fn with_close_connection(mut self, close: bool) -> Self {
        self.close_connection = close;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
