pub mod connectors;
pub mod registry;
pub mod normalizer;
pub mod cache;
pub mod lookup;

use serde::Deserialize;
use std::collections::HashMap;

/// One provider record as returned by `/simple/price` with every
/// `include_*` flag set. The provider sends `null` or omits a field when it
/// has no figure for it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ProviderQuote {
    #[serde(rename = "usd", default)]
    pub price: Option<f64>,
    #[serde(rename = "usd_24h_change", default)]
    pub change_24h: Option<f64>,
    #[serde(rename = "usd_24h_vol", default)]
    pub volume_24h: Option<f64>,
    #[serde(rename = "usd_market_cap", default)]
    pub market_cap: Option<f64>,
}

impl ProviderQuote {
    pub fn new(price: f64, change_24h: f64, volume_24h: f64, market_cap: f64) -> Self {
        ProviderQuote {
            price: Some(price),
            change_24h: Some(change_24h),
            volume_24h: Some(volume_24h),
            market_cap: Some(market_cap),
        }
    }
}

/// Raw provider reply keyed by provider id. Sparse: ids the provider does not
/// know are simply absent.
pub type RawPriceMap = HashMap<String, ProviderQuote>;
