//! # Backend Configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Connection settings of one legal-officer node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpBackendConfig {
    /// Node base URL, without trailing slash.
    pub base_url: String,
    /// Bearer token of the authenticated session.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl HttpBackendConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LOC_BACKEND_URL`: Node base URL (default: http://localhost:8080)
    /// - `LOC_BACKEND_TOKEN`: Session token (default: none)
    /// - `LOC_BACKEND_TIMEOUT_SECS`: Request timeout (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("LOC_BACKEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            token: env::var("LOC_BACKEND_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout_secs: env::var("LOC_BACKEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Create a config for testing.
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Some("test-token".to_string()),
            timeout_secs: 5,
        }
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
