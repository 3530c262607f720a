use async_trait::async_trait;
use crate::error::Result;
use crate::price_infra::{ProviderQuote, RawPriceMap};

/// Outbound side of the price path. Implementations neither retry nor catch:
/// every failure goes back to the caller as-is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    /// One batched request for every id. Ids the provider does not know are
    /// absent from the returned map.
    async fn fetch_prices(&self, provider_ids: &[String]) -> Result<RawPriceMap>;

    /// Uncached single-id request; `Ok(None)` when the provider has no record.
    async fn fetch_price(&self, provider_id: &str) -> Result<Option<ProviderQuote>>;
}
