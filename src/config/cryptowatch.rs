//! Cryptowatch-specific configuration constants and types.

use std::time::Duration;

/// Configuration for the Cryptowatch REST client
/// (This is the runtime struct used by the Http Client)
#[derive(Debug, Clone)]
pub struct CryptowatchApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

impl Default for CryptowatchApiConfig {
    fn default() -> Self {
        Self {
            base_url: CRYPTOWATCH.base_url.to_string(),
            timeout_ms: CRYPTOWATCH.client.timeout_ms,
            user_agent: CRYPTOWATCH.client.user_agent,
        }
    }
}

impl CryptowatchApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Default values for the Rest Client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

/// The Master Configuration Struct
pub struct CryptowatchConfig {
    /// REST base URL; market paths are appended to it
    pub base_url: &'static str,
    pub client: ClientDefaults,
}

pub const CRYPTOWATCH: CryptowatchConfig = CryptowatchConfig {
    base_url: "https://api.cryptowat.ch",
    client: ClientDefaults {
        timeout_ms: 30_000,
        user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
    },
};
