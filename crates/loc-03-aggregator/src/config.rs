//! # Aggregator Configuration

use serde::{Deserialize, Serialize};

/// Aggregator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Fail `fetch_all` when every queried source failed.
    /// When false, an empty result is returned instead.
    pub fail_when_all_sources_fail: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fail_when_all_sources_fail: true,
        }
    }
}

impl AggregatorConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self::default()
    }

    /// Lenient mode: total failure yields an empty result.
    pub fn lenient() -> Self {
        Self {
            fail_when_all_sources_fail: false,
        }
    }
}
