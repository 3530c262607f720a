use serde::{Deserialize, Serialize};

/// One row of the symbol registry.
///
/// `trading_symbol` is unique across a registry. `provider_id` is not: several
/// trading symbols may price off the same provider asset, and a row may have
/// no provider id at all (it is then always reported as missing).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SymbolMapping {
    pub trading_symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub display_name: String,
    #[serde(default)]
    pub provider_id: Option<String>,
}

impl SymbolMapping {
    pub fn new(
        trading_symbol: &str,
        base_asset: &str,
        quote_asset: &str,
        display_name: &str,
        provider_id: Option<&str>,
    ) -> Self {
        SymbolMapping {
            trading_symbol: trading_symbol.to_string(),
            base_asset: base_asset.to_string(),
            quote_asset: quote_asset.to_string(),
            display_name: display_name.to_string(),
            provider_id: provider_id.map(str::to_string),
        }
    }
}
