use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::types::symbol::SymbolMapping;

pub mod loader;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Absent is legal at startup; the first fetch reports it.
    pub api_key: Option<String>,
    pub api_key_header: String,
    pub bulk_timeout_ms: u64,
    pub single_timeout_ms: u64,
}

impl ProviderConfig {
    pub fn bulk_timeout(&self) -> Duration {
        Duration::from_millis(self.bulk_timeout_ms)
    }

    pub fn single_timeout(&self) -> Duration {
        Duration::from_millis(self.single_timeout_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            api_key: None,
            api_key_header: "x-cg-demo-api-key".to_string(),
            bulk_timeout_ms: 15_000,
            single_timeout_ms: 10_000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { ttl_secs: 30 }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    pub json: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub quote_suffix: String,
    /// Replaces the built-in listing when non-empty.
    pub symbols: Vec<SymbolMapping>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            quote_suffix: crate::price_infra::registry::DEFAULT_QUOTE_SUFFIX.to_string(),
            symbols: Vec::new(),
        }
    }
}
