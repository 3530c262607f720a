use serde::{Deserialize, Serialize};

/// Normalized 24h market view of one trading symbol, in USD.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTicker {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    /// Signed 24h change, percent.
    pub change: f64,
    pub volume: f64,
    pub market_cap: f64,
}
