//! Identity API configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_TIMEOUT_SEC: u64 = 10;
pub const MAX_TIMEOUT_SEC: u64 = 120;

/// Identity API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API, with trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

fn default_base_url() -> String {
    "https://api.twitter.com/2/".to_string()
}

fn default_timeout_sec() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_sec: default_timeout_sec(),
        }
    }
}

impl ApiConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }

    /// Full URL of the identity lookup endpoint
    pub fn identity_url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}users/me", self.base_url)
        } else {
            format!("{}/users/me", self.base_url)
        }
    }

    /// Clamp an out-of-range timeout, describing the change
    pub fn normalize(&mut self) -> Option<String> {
        let clamped = self.timeout_sec.clamp(MIN_TIMEOUT_SEC, MAX_TIMEOUT_SEC);
        if clamped == self.timeout_sec {
            return None;
        }
        let notice = format!(
            "api.timeout_sec {} out of range {}..={}, using {}",
            self.timeout_sec, MIN_TIMEOUT_SEC, MAX_TIMEOUT_SEC, clamped
        );
        self.timeout_sec = clamped;
        Some(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_url_handles_trailing_slash() {
        let mut config = ApiConfig::default();
        assert_eq!(config.identity_url(), "https://api.twitter.com/2/users/me");

        config.base_url = "http://localhost:8080/2".to_string();
        assert_eq!(config.identity_url(), "http://localhost:8080/2/users/me");
    }

    #[test]
    fn test_normalize_clamps_timeout() {
        let mut config = ApiConfig {
            timeout_sec: 1,
            ..Default::default()
        };
        let notice = config.normalize().unwrap();
        assert_eq!(config.timeout_sec, MIN_TIMEOUT_SEC);
        assert!(notice.contains("api.timeout_sec 1"));

        let mut config = ApiConfig {
            timeout_sec: 999,
            ..Default::default()
        };
        assert!(config.normalize().is_some());
        assert_eq!(config.timeout_sec, MAX_TIMEOUT_SEC);

        let mut config = ApiConfig::default();
        assert_eq!(config.normalize(), None);
    }
}
