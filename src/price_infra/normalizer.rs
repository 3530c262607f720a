use serde::Serialize;
use crate::price_infra::registry::SymbolRegistry;
use crate::price_infra::{ProviderQuote, RawPriceMap};
use crate::types::symbol::SymbolMapping;
use crate::types::ticker::PriceTicker;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReason {
    NoProviderId,
    AbsentFromResponse,
}

/// A registry row that produced no ticker in one refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissingSymbol {
    pub trading_symbol: String,
    pub provider_id: Option<String>,
    pub reason: MissingReason,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedPrices {
    pub tickers: Vec<PriceTicker>,
    /// Diagnostic only; never returned to HTTP callers.
    pub missing: Vec<MissingSymbol>,
}

/// Joins a raw provider reply back onto the registry.
///
/// Walks the registry in declared order. Each row is joined independently, so
/// rows sharing a provider id each get their own ticker built from the same
/// quote. Rows that cannot be joined land in `missing` and never fail the
/// batch.
pub fn normalize(registry: &SymbolRegistry, raw: &RawPriceMap) -> NormalizedPrices {
    let mut out = NormalizedPrices {
        tickers: Vec::with_capacity(registry.len()),
        missing: Vec::new(),
    };

    for mapping in registry.entries() {
        match join(mapping, raw) {
            Ok(ticker) => out.tickers.push(ticker),
            Err(reason) => out.missing.push(MissingSymbol {
                trading_symbol: mapping.trading_symbol.clone(),
                provider_id: mapping.provider_id.clone(),
                reason,
            }),
        }
    }

    out
}

fn join(
    mapping: &SymbolMapping,
    raw: &RawPriceMap,
) -> std::result::Result<PriceTicker, MissingReason> {
    let provider_id = mapping
        .provider_id
        .as_deref()
        .ok_or(MissingReason::NoProviderId)?;
    let quote = raw
        .get(provider_id)
        .ok_or(MissingReason::AbsentFromResponse)?;

    Ok(to_ticker(&mapping.trading_symbol, &mapping.display_name, quote))
}

/// Builds a ticker from one quote. Any figure the provider left out reads as
/// 0, price included, so zero and unknown are indistinguishable downstream.
pub fn to_ticker(symbol: &str, name: &str, quote: &ProviderQuote) -> PriceTicker {
    PriceTicker {
        symbol: symbol.to_string(),
        name: name.to_string(),
        price: quote.price.unwrap_or(0.0),
        change: quote.change_24h.unwrap_or(0.0),
        volume: quote.volume_24h.unwrap_or(0.0),
        market_cap: quote.market_cap.unwrap_or(0.0),
    }
}

/// Emits the missing-list at warn level; the partial batch still stands.
pub fn log_missing(missing: &[MissingSymbol]) {
    if missing.is_empty() {
        return;
    }

    let symbols: Vec<&str> = missing.iter().map(|m| m.trading_symbol.as_str()).collect();
    tracing::warn!(
        count = missing.len(),
        symbols = ?symbols,
        "Partial price data: symbols missing from provider response"
    );
}
