// src/config.rs
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://blockchain.info";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Wallet backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Base URL, without trailing slash
    pub api_url: String,
    /// Optional `api_code` sent with every request
    pub api_code: Option<String>,
    pub timeout: Duration,
    pub log_level: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_code: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            log_level: "info".to_string(),
        }
    }
}

impl WalletConfig {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|k| std::env::var(k).ok())
    }

    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = var("WALLET_API_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_code: var("WALLET_API_CODE").filter(|s| !s.is_empty()),
            timeout: Duration::from_millis(
                var("WALLET_TIMEOUT_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_MS),
            ),
            log_level: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}
