use tracing::Instrument;
use crate::error::{Error, Result};
use crate::interfaces::price_fetcher::PriceFetcher;
use crate::observability::tracing::trace_single_lookup;
use crate::price_infra::normalizer::to_ticker;
use crate::price_infra::registry::SymbolRegistry;
use crate::types::ticker::PriceTicker;

/// Uncached price for one provider id. Bypasses the TTL cache entirely; every
/// call is its own upstream request.
pub async fn single_price(
    fetcher: &dyn PriceFetcher,
    registry: &SymbolRegistry,
    provider_id: &str,
) -> Result<PriceTicker> {
    // The provider reads a comma as an id separator.
    if provider_id.is_empty() || provider_id.contains(',') {
        return Err(Error::NotFound(provider_id.to_string()));
    }

    let span = trace_single_lookup(provider_id);

    async move {
        let quote = fetcher
            .fetch_price(provider_id)
            .await?
            .ok_or_else(|| Error::NotFound(provider_id.to_string()))?;

        let symbol = registry.resolve_symbol(provider_id);
        let name = registry.resolve_name(provider_id);
        Ok(to_ticker(&symbol, &name, &quote))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::price_fetcher::MockPriceFetcher;
    use crate::price_infra::ProviderQuote;

    #[tokio::test]
    async fn known_id_uses_registry_metadata() {
        let mut fetcher = MockPriceFetcher::new();
        fetcher.expect_fetch_price()
            .withf(|id| id.to_string() == "ethereum")
            .times(1)
            .returning(|_| Ok(Some(ProviderQuote::new(2650.0, -1.1, 12e9, 320e9))));

        let ticker = single_price(&fetcher, &SymbolRegistry::builtin(), "ethereum").await.unwrap();

        assert_eq!(ticker.symbol, "ETHUSDT");
        assert_eq!(ticker.name, "Ethereum");
        assert_eq!(ticker.price, 2650.0);
        assert_eq!(ticker.change, -1.1);
    }

    #[tokio::test]
    async fn unlisted_id_gets_synthesized_symbol() {
        let mut fetcher = MockPriceFetcher::new();
        fetcher.expect_fetch_price()
            .times(1)
            .returning(|_| Ok(Some(ProviderQuote { price: Some(0.003), ..Default::default() })));

        let ticker = single_price(&fetcher, &SymbolRegistry::builtin(), "bonk").await.unwrap();

        assert_eq!(ticker.symbol, "BONKUSDT");
        assert_eq!(ticker.name, "bonk");
        assert_eq!(ticker.market_cap, 0.0);
    }

    #[tokio::test]
    async fn absent_id_is_not_found() {
        let mut fetcher = MockPriceFetcher::new();
        fetcher.expect_fetch_price().times(1).returning(|_| Ok(None));

        let err = single_price(&fetcher, &SymbolRegistry::builtin(), "nope").await.unwrap_err();
        assert_eq!(err, Error::NotFound("nope".to_string()));
    }

    #[tokio::test]
    async fn comma_separated_id_rejected_before_request() {
        let mut fetcher = MockPriceFetcher::new();
        fetcher.expect_fetch_price().times(0);

        let err = single_price(&fetcher, &SymbolRegistry::builtin(), "bitcoin,ethereum")
            .await
            .unwrap_err();
        assert_eq!(err, Error::NotFound("bitcoin,ethereum".to_string()));
    }

    #[tokio::test]
    async fn empty_quote_reads_as_zero() {
        let mut fetcher = MockPriceFetcher::new();
        fetcher.expect_fetch_price()
            .times(1)
            .returning(|_| Ok(Some(ProviderQuote::default())));

        let ticker = single_price(&fetcher, &SymbolRegistry::builtin(), "bitcoin").await.unwrap();
        assert_eq!(ticker.symbol, "BTCUSDT");
        assert_eq!(ticker.price, 0.0);
    }

    #[tokio::test]
    async fn provider_failure_passes_through() {
        let mut fetcher = MockPriceFetcher::new();
        fetcher.expect_fetch_price()
            .times(1)
            .returning(|_| Err(Error::ProviderTimeout { timeout_ms: 10_000 }));

        let err = single_price(&fetcher, &SymbolRegistry::builtin(), "bitcoin").await.unwrap_err();
        assert_eq!(err, Error::ProviderTimeout { timeout_ms: 10_000 });
    }
}
