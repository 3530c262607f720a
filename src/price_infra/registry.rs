use std::collections::HashSet;
use crate::error::{Error, Result};
use crate::types::symbol::SymbolMapping;

pub const DEFAULT_QUOTE_SUFFIX: &str = "USDT";

/// Built-in listing: (trading symbol, base, display name, provider id).
/// Row order is the order tickers are served in.
const BUILTIN_LISTING: &[(&str, &str, &str, Option<&str>)] = &[
    ("BTCUSDT", "BTC", "Bitcoin", Some("bitcoin")),
    ("ETHUSDT", "ETH", "Ethereum", Some("ethereum")),
    ("BNBUSDT", "BNB", "BNB", Some("binancecoin")),
    ("SOLUSDT", "SOL", "Solana", Some("solana")),
    ("XRPUSDT", "XRP", "XRP", Some("ripple")),
    ("USDCUSDT", "USDC", "USD Coin", Some("usd-coin")),
    ("ADAUSDT", "ADA", "Cardano", Some("cardano")),
    ("DOGEUSDT", "DOGE", "Dogecoin", Some("dogecoin")),
    ("TRXUSDT", "TRX", "TRON", Some("tron")),
    ("TONUSDT", "TON", "Toncoin", Some("the-open-network")),
    ("AVAXUSDT", "AVAX", "Avalanche", Some("avalanche-2")),
    ("SHIBUSDT", "SHIB", "Shiba Inu", Some("shiba-inu")),
    ("DOTUSDT", "DOT", "Polkadot", Some("polkadot")),
    ("LINKUSDT", "LINK", "Chainlink", Some("chainlink")),
    ("BCHUSDT", "BCH", "Bitcoin Cash", Some("bitcoin-cash")),
    ("NEARUSDT", "NEAR", "NEAR Protocol", Some("near")),
    ("LTCUSDT", "LTC", "Litecoin", Some("litecoin")),
    // POL replaced MATIC; both tickers stay listed and price off one asset.
    ("MATICUSDT", "MATIC", "Polygon", Some("matic-network")),
    ("POLUSDT", "POL", "Polygon Ecosystem Token", Some("matic-network")),
    ("UNIUSDT", "UNI", "Uniswap", Some("uniswap")),
    ("ICPUSDT", "ICP", "Internet Computer", Some("internet-computer")),
    ("ETCUSDT", "ETC", "Ethereum Classic", Some("ethereum-classic")),
    ("APTUSDT", "APT", "Aptos", Some("aptos")),
    ("XLMUSDT", "XLM", "Stellar", Some("stellar")),
    ("ATOMUSDT", "ATOM", "Cosmos Hub", Some("cosmos")),
    ("FILUSDT", "FIL", "Filecoin", Some("filecoin")),
    ("ARBUSDT", "ARB", "Arbitrum", Some("arbitrum")),
    ("OPUSDT", "OP", "Optimism", Some("optimism")),
    ("INJUSDT", "INJ", "Injective", Some("injective-protocol")),
    ("SUIUSDT", "SUI", "Sui", Some("sui")),
    ("AAVEUSDT", "AAVE", "Aave", Some("aave")),
    ("PEPEUSDT", "PEPE", "Pepe", Some("pepe")),
    ("WBTCUSDT", "WBTC", "Wrapped Bitcoin", Some("wrapped-bitcoin")),
    ("DAIUSDT", "DAI", "Dai", Some("dai")),
    // Beacon ETH has no standalone provider listing.
    ("BETHUSDT", "BETH", "Beacon ETH", None),
];

/// Static table joining trading symbols to provider ids.
#[derive(Clone, Debug)]
pub struct SymbolRegistry {
    entries: Vec<SymbolMapping>,
    quote_suffix: String,
}

impl SymbolRegistry {
    /// Builds a registry, rejecting duplicate trading symbols. Shared or
    /// absent provider ids are accepted.
    pub fn new(entries: Vec<SymbolMapping>, quote_suffix: &str) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.trading_symbol.as_str()) {
                return Err(Error::DuplicateSymbol(entry.trading_symbol.clone()));
            }
        }

        Ok(SymbolRegistry {
            entries,
            quote_suffix: quote_suffix.to_string(),
        })
    }

    pub fn builtin() -> Self {
        let entries = BUILTIN_LISTING
            .iter()
            .map(|(symbol, base, name, id)| {
                SymbolMapping::new(symbol, base, DEFAULT_QUOTE_SUFFIX, name, *id)
            })
            .collect();

        SymbolRegistry {
            entries,
            quote_suffix: DEFAULT_QUOTE_SUFFIX.to_string(),
        }
    }

    pub fn entries(&self) -> &[SymbolMapping] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct provider ids in registry order, rows without one skipped.
    pub fn provider_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter_map(|e| e.provider_id.as_deref())
            .filter(|id| seen.insert(*id))
            .map(str::to_string)
            .collect()
    }

    pub fn resolve_symbol(&self, provider_id: &str) -> String {
        self.find(provider_id)
            .map(|e| e.trading_symbol.clone())
            .unwrap_or_else(|| format!("{}{}", provider_id.to_uppercase(), self.quote_suffix))
    }

    pub fn resolve_name(&self, provider_id: &str) -> String {
        self.find(provider_id)
            .map(|e| e.display_name.clone())
            .unwrap_or_else(|| provider_id.to_string())
    }

    fn find(&self, provider_id: &str) -> Option<&SymbolMapping> {
        self.entries
            .iter()
            .find(|e| e.provider_id.as_deref() == Some(provider_id))
    }
}
