//! Executor configuration and credentials.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::ConfigError;
use crate::signer::DEFAULT_RECV_WINDOW_MS;

pub const MAINNET_URL: &str = "https://fapi.binance.com";
pub const TESTNET_URL: &str = "https://testnet.binancefuture.com";

/// Venue environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Testnet,
    Mainnet,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Testnet => TESTNET_URL,
            Self::Mainnet => MAINNET_URL,
        }
    }

    /// `USE_TESTNET` semantics: `1`, `true` or `yes` (any case) select the
    /// testnet, anything else mainnet.
    pub fn from_testnet_flag(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Self::Testnet,
            _ => Self::Mainnet,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Testnet => write!(f, "testnet"),
            Self::Mainnet => write!(f, "mainnet"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Overrides the environment's URL, e.g. a local mock venue.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_recv_window_ms() -> u64 {
    DEFAULT_RECV_WINDOW_MS
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            recv_window_ms: default_recv_window_ms(),
        }
    }
}

impl ExecutorConfig {
    /// Executor pointed at an explicit URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    /// Base URL without a trailing slash.
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if !(1..=60_000).contains(&self.recv_window_ms) {
            return Err(ConfigError::InvalidRecvWindow(self.recv_window_ms));
        }
        let url = self.resolved_base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(url.to_string()));
        }
        Ok(())
    }
}

/// API key pair. Empty values are allowed and produce degraded requests.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: Zeroizing<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: Zeroizing::new(api_secret.into()),
        }
    }

    /// `BINANCE_API_KEY` / `BINANCE_API_SECRET`, empty when unset.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("BINANCE_API_KEY").unwrap_or_default(),
            std::env::var("BINANCE_API_SECRET").unwrap_or_default(),
        )
    }

    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_testnet() {
        let config = ExecutorConfig::default();
        assert_eq!(config.resolved_base_url(), TESTNET_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.recv_window_ms, 5_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mainnet_and_override() {
        let config: ExecutorConfig = toml::from_str(r#"environment = "mainnet""#).unwrap();
        assert_eq!(config.resolved_base_url(), MAINNET_URL);

        let config = ExecutorConfig::with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.resolved_base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ExecutorConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeout)));

        let config = ExecutorConfig {
            recv_window_ms: 60_001,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRecvWindow(60_001))
        ));

        let config = ExecutorConfig::with_base_url("ftp://venue");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_testnet_flag() {
        assert_eq!(Environment::from_testnet_flag("False"), Environment::Mainnet);
        assert_eq!(Environment::from_testnet_flag("true"), Environment::Testnet);
        assert_eq!(Environment::from_testnet_flag("YES"), Environment::Testnet);
        assert_eq!(Environment::from_testnet_flag("0"), Environment::Mainnet);
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("key", "hunter2");
        let out = format!("{creds:?}");
        assert!(out.contains("key"));
        assert!(!out.contains("hunter2"));
        assert!(creds.is_complete());
        assert!(!Credentials::default().is_complete());
    }
}
