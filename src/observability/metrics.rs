use std::sync::Once;
use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Histogram, HistogramOpts, IntGauge, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Cache metrics
    pub static ref CACHE_HITS: Counter = Counter::new(
        "price_cache_hits_total",
        "Requests served from a fresh snapshot"
    ).unwrap();

    pub static ref CACHE_MISSES: Counter = Counter::new(
        "price_cache_misses_total",
        "Requests that found the snapshot empty or expired"
    ).unwrap();

    pub static ref REFRESH_FAILURES: Counter = Counter::new(
        "price_refresh_failures_total",
        "Refresh attempts that failed upstream"
    ).unwrap();

    pub static ref STALE_SERVED: Counter = Counter::new(
        "price_stale_snapshots_served_total",
        "Responses served from an expired snapshot after a failed refresh"
    ).unwrap();

    pub static ref SNAPSHOT_TICKERS: IntGauge = IntGauge::new(
        "price_snapshot_tickers",
        "Tickers in the current snapshot"
    ).unwrap();

    pub static ref MISSING_SYMBOLS: IntGauge = IntGauge::new(
        "price_missing_symbols",
        "Registry rows without provider data in the latest refresh"
    ).unwrap();

    // Provider metrics
    pub static ref PROVIDER_REQUESTS: Counter = Counter::new(
        "provider_requests_total",
        "Outbound requests to the price provider"
    ).unwrap();

    pub static ref PROVIDER_ERRORS: Counter = Counter::new(
        "provider_errors_total",
        "Outbound requests that failed"
    ).unwrap();

    pub static ref PROVIDER_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "provider_request_latency_seconds",
            "Price provider round-trip latency"
        ).buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0])
    ).unwrap();
}

static REGISTER: Once = Once::new();

pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY.register(Box::new(CACHE_HITS.clone())).unwrap();
        REGISTRY.register(Box::new(CACHE_MISSES.clone())).unwrap();
        REGISTRY.register(Box::new(REFRESH_FAILURES.clone())).unwrap();
        REGISTRY.register(Box::new(STALE_SERVED.clone())).unwrap();
        REGISTRY.register(Box::new(SNAPSHOT_TICKERS.clone())).unwrap();
        REGISTRY.register(Box::new(MISSING_SYMBOLS.clone())).unwrap();
        REGISTRY.register(Box::new(PROVIDER_REQUESTS.clone())).unwrap();
        REGISTRY.register(Box::new(PROVIDER_ERRORS.clone())).unwrap();
        REGISTRY.register(Box::new(PROVIDER_LATENCY.clone())).unwrap();
    });
}

/// Prometheus text exposition of everything in `REGISTRY`.
pub fn gather_text() -> Result<String, prometheus::Error> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_idempotent() {
        register_metrics();
        register_metrics();
        CACHE_HITS.inc();

        let text = gather_text().unwrap();
        assert!(text.contains("price_cache_hits_total"));
        assert!(text.contains("provider_request_latency_seconds"));
    }
}
