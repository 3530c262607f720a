use std::time::{Duration, Instant};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::interfaces::price_fetcher::PriceFetcher;
use crate::observability::metrics::{PROVIDER_ERRORS, PROVIDER_LATENCY, PROVIDER_REQUESTS};
use crate::price_infra::{ProviderQuote, RawPriceMap};

/// CoinGecko `/simple/price` client.
pub struct CoinGeckoConnector {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    api_key_header: String,
    bulk_timeout: Duration,
    single_timeout: Duration,
}

impl CoinGeckoConnector {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let endpoint = Url::parse(&format!(
            "{}/simple/price",
            config.base_url.trim_end_matches('/')
        ))
        .map_err(|e| Error::ConfigurationError(format!("invalid provider base_url: {}", e)))?;

        let client = Client::builder()
            .user_agent(concat!("market-feed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ConfigurationError(format!("http client: {}", e)))?;

        Ok(CoinGeckoConnector {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            api_key_header: config.api_key_header.clone(),
            bulk_timeout: config.bulk_timeout(),
            single_timeout: config.single_timeout(),
        })
    }

    fn credential(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::ConfigurationError("provider API key is not configured".to_string()))
    }

    fn url_for(&self, ids: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("ids", ids)
            .append_pair("vs_currencies", "usd")
            .append_pair("include_24hr_change", "true")
            .append_pair("include_24hr_vol", "true")
            .append_pair("include_market_cap", "true");
        url
    }

    async fn request(&self, ids: &str, timeout: Duration) -> Result<RawPriceMap> {
        let api_key = self.credential()?;
        let url = self.url_for(ids);

        PROVIDER_REQUESTS.inc();
        let timer = Instant::now();
        let result = self.send(url, api_key, timeout).await;
        PROVIDER_LATENCY.observe(timer.elapsed().as_secs_f64());

        if let Err(e) = &result {
            PROVIDER_ERRORS.inc();
            tracing::warn!(error = %e, "CoinGecko request failed");
        }
        result
    }

    async fn send(&self, url: Url, api_key: &str, timeout: Duration) -> Result<RawPriceMap> {
        let resp = self
            .client
            .get(url)
            .header("accept", "application/json")
            .header(self.api_key_header.as_str(), api_key)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("CoinGecko rate limited");
            }
            return Err(Error::ProviderStatus { status: status.as_u16() });
        }

        resp.json::<RawPriceMap>()
            .await
            .map_err(|e| transport_error(e, timeout))
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> Error {
    if e.is_timeout() {
        Error::ProviderTimeout { timeout_ms: timeout.as_millis() as u64 }
    } else if e.is_decode() {
        Error::DeserializationError(e.to_string())
    } else {
        Error::ProviderUnavailable(e.to_string())
    }
}

#[async_trait]
impl PriceFetcher for CoinGeckoConnector {
    async fn fetch_prices(&self, provider_ids: &[String]) -> Result<RawPriceMap> {
        if provider_ids.is_empty() {
            self.credential()?;
            return Ok(RawPriceMap::new());
        }

        let prices = self.request(&provider_ids.join(","), self.bulk_timeout).await?;
        tracing::debug!(requested = provider_ids.len(), returned = prices.len(), "CoinGecko bulk prices");
        Ok(prices)
    }

    async fn fetch_price(&self, provider_id: &str) -> Result<Option<ProviderQuote>> {
        let mut prices = self.request(provider_id, self.single_timeout).await?;
        Ok(prices.remove(provider_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector(api_key: Option<&str>) -> CoinGeckoConnector {
        CoinGeckoConnector::new(&ProviderConfig {
            base_url: "https://api.coingecko.com/api/v3/".to_string(),
            api_key: api_key.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn url_requests_every_field() {
        let url = connector(Some("k")).url_for("bitcoin,ethereum");

        assert_eq!(url.path(), "/api/v3/simple/price");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("ids".to_string(), "bitcoin,ethereum".to_string()),
                ("vs_currencies".to_string(), "usd".to_string()),
                ("include_24hr_change".to_string(), "true".to_string()),
                ("include_24hr_vol".to_string(), "true".to_string()),
                ("include_market_cap".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_base_url_is_configuration_error() {
        let result = CoinGeckoConnector::new(&ProviderConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::ConfigurationError(_))));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_network() {
        let connector = connector(None);

        let bulk = connector.fetch_prices(&["bitcoin".to_string()]).await;
        let single = connector.fetch_price("bitcoin").await;

        assert!(matches!(bulk, Err(Error::ConfigurationError(_))));
        assert!(matches!(single, Err(Error::ConfigurationError(_))));
    }

    #[tokio::test]
    async fn empty_id_list_skips_request() {
        let prices = connector(Some("k")).fetch_prices(&[]).await.unwrap();
        assert!(prices.is_empty());
    }
}
