use crate::config::*;
use crate::error::{Error, Result};
use crate::price_infra::registry::SymbolRegistry;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Fallback credential variable, read when the layered config has no key.
pub const API_KEY_ENV: &str = "COINGECKO_API_KEY";

/// Prefix for layered overrides, e.g. `MARKETFEED__CACHE__TTL_SECS`.
pub const ENV_PREFIX: &str = "MARKETFEED";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true)
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub log: LogConfig,
    pub registry: RegistryConfig,
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(environment())
            .build()
            .map_err(|e| Error::ConfigurationError(e.to_string()))?;

        let mut app: AppConfig = config.try_deserialize()
            .map_err(|e| Error::ConfigurationError(e.to_string()))?;

        if app.provider.api_key.is_none() {
            app.provider.api_key = std::env::var(API_KEY_ENV).ok();
        }
        app.provider.api_key = app.provider.api_key.filter(|k| !k.trim().is_empty());

        Ok(app)
    }

    /// Parses a TOML document on its own, without files or environment.
    pub fn from_toml(source: &str) -> Result<Self> {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::ConfigurationError(e.to_string()))
    }

    pub fn symbol_registry(&self) -> Result<SymbolRegistry> {
        if self.registry.symbols.is_empty() {
            return Ok(SymbolRegistry::builtin());
        }
        SymbolRegistry::new(self.registry.symbols.clone(), &self.registry.quote_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.cache.ttl_secs, 30);
        assert_eq!(cfg.provider.bulk_timeout_ms, 15_000);
        assert_eq!(cfg.provider.single_timeout_ms, 10_000);
        assert!(cfg.provider.api_key.is_none());
        assert_eq!(cfg.symbol_registry().unwrap().len(), SymbolRegistry::builtin().len());
    }

    #[test]
    fn symbols_override_builtin_registry() {
        let cfg = AppConfig::from_toml(
            r#"
            [provider]
            api_key = "demo"

            [[registry.symbols]]
            trading_symbol = "BTCUSDT"
            base_asset = "BTC"
            quote_asset = "USDT"
            display_name = "Bitcoin"
            provider_id = "bitcoin"

            [[registry.symbols]]
            trading_symbol = "BETHUSDT"
            base_asset = "BETH"
            quote_asset = "USDT"
            display_name = "Beacon ETH"
            "#,
        )
        .unwrap();

        let registry = cfg.symbol_registry().unwrap();
        assert_eq!(cfg.provider.api_key.as_deref(), Some("demo"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.entries()[1].provider_id, None);
    }

    #[test]
    fn environment_overrides_use_crate_prefix() {
        let vars = std::collections::HashMap::from([
            ("MARKETFEED__CACHE__TTL_SECS".to_string(), "5".to_string()),
            ("MARKETFEED__PROVIDER__API_KEY".to_string(), "from-env".to_string()),
            ("PRICEINFRA__SERVER__PORT".to_string(), "9999".to_string()),
        ]);

        let cfg: AppConfig = Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();

        assert_eq!(cfg.cache.ttl_secs, 5);
        assert_eq!(cfg.provider.api_key.as_deref(), Some("from-env"));
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn duplicate_symbols_fail_registry_build() {
        let cfg = AppConfig::from_toml(
            r#"
            [[registry.symbols]]
            trading_symbol = "BTCUSDT"
            base_asset = "BTC"
            quote_asset = "USDT"
            display_name = "Bitcoin"
            provider_id = "bitcoin"

            [[registry.symbols]]
            trading_symbol = "BTCUSDT"
            base_asset = "BTC"
            quote_asset = "USDT"
            display_name = "Bitcoin"
            provider_id = "bitcoin"
            "#,
        )
        .unwrap();

        assert!(matches!(cfg.symbol_registry(), Err(Error::DuplicateSymbol(_))));
    }
}
