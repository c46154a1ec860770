//! # Client Configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Defaults applied by transitions when the caller does not override them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Publish accepted items when opening a LOC.
    /// Identity LOCs always publish.
    pub auto_publish_on_open: bool,
    /// Acknowledge published items when closing a LOC.
    pub auto_ack_on_close: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auto_publish_on_open: true,
            auto_ack_on_close: false,
        }
    }
}

fn flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LOC_AUTO_PUBLISH_ON_OPEN`: Publish accepted items at open (default: true)
    /// - `LOC_AUTO_ACK_ON_CLOSE`: Acknowledge items at close (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auto_publish_on_open: flag("LOC_AUTO_PUBLISH_ON_OPEN", defaults.auto_publish_on_open),
            auto_ack_on_close: flag("LOC_AUTO_ACK_ON_CLOSE", defaults.auto_ack_on_close),
        }
    }

    /// Create a config for testing: nothing happens implicitly.
    pub fn for_testing() -> Self {
        Self {
            auto_publish_on_open: false,
            auto_ack_on_close: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.auto_publish_on_open);
        assert!(!config.auto_ack_on_close);
    }

    #[test]
    fn test_testing_config_is_explicit() {
        let config = ClientConfig::for_testing();
        assert!(!config.auto_publish_on_open);
        assert!(!config.auto_ack_on_close);
    }

    #[test]
    fn test_unknown_flag_keeps_default() {
        assert!(flag("LOC_TEST_FLAG_THAT_IS_NEVER_SET", true));
        assert!(!flag("LOC_TEST_FLAG_THAT_IS_NEVER_SET", false));
    }
}
