pub mod types;
pub mod utils;
pub mod price_infra;
pub mod error;
pub mod config;
pub mod observability;
pub mod interfaces;
pub mod api;

use std::sync::Arc;
use crate::api::rest::ApiState;
use crate::config::loader::AppConfig;
use crate::error::Result;
use crate::interfaces::price_fetcher::PriceFetcher;
use crate::price_infra::cache::PriceCache;
use crate::price_infra::connectors::coingecko::CoinGeckoConnector;

/// Wires registry, CoinGecko connector and cache from configuration.
pub fn build_state(config: &AppConfig) -> Result<Arc<ApiState>> {
    let registry = Arc::new(config.symbol_registry()?);
    let fetcher: Arc<dyn PriceFetcher> = Arc::new(CoinGeckoConnector::new(&config.provider)?);
    let cache = Arc::new(PriceCache::new(
        Arc::clone(&registry),
        Arc::clone(&fetcher),
        config.cache.ttl(),
    ));

    Ok(Arc::new(ApiState {
        cache,
        fetcher,
        registry,
    }))
}
