use std::sync::Arc;
use std::time::{Duration, Instant};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::Instrument;
use crate::error::{Error, Result};
use crate::interfaces::price_fetcher::PriceFetcher;
use crate::observability::metrics::{
    CACHE_HITS, CACHE_MISSES, MISSING_SYMBOLS, REFRESH_FAILURES, SNAPSHOT_TICKERS, STALE_SERVED,
};
use crate::observability::tracing::trace_refresh;
use crate::price_infra::normalizer::{log_missing, normalize};
use crate::price_infra::registry::SymbolRegistry;
use crate::types::ticker::PriceTicker;
use crate::utils::clock::{Clock, SystemClock};

pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Tickers from one successful refresh. Never mutated once built.
#[derive(Clone, Debug)]
pub struct PriceSnapshot {
    pub tickers: Vec<PriceTicker>,
    pub fetched_at: Instant,
    pub fetched_at_utc: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    Empty,
    Fresh,
    Stale,
}

/// How a `get_prices` call was satisfied.
#[derive(Clone, Debug)]
pub enum CacheRead {
    /// Snapshot was younger than the TTL; no upstream call.
    Hit(Arc<PriceSnapshot>),
    /// A refresh succeeded during this call, or while it waited on one.
    Refreshed(Arc<PriceSnapshot>),
    /// The refresh failed and an expired snapshot stands in.
    Degraded {
        snapshot: Arc<PriceSnapshot>,
        cause: Error,
    },
}

impl CacheRead {
    pub fn snapshot(&self) -> &Arc<PriceSnapshot> {
        match self {
            CacheRead::Hit(s) | CacheRead::Refreshed(s) => s,
            CacheRead::Degraded { snapshot, .. } => snapshot,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, CacheRead::Degraded { .. })
    }
}

struct CacheEntry {
    snapshot: Option<Arc<PriceSnapshot>>,
    /// Bumped on every completed refresh attempt, success or not.
    attempts: u64,
    last_error: Option<Error>,
}

/// Process-wide TTL cache over the batched provider call.
///
/// At most one refresh is in flight. Callers that find the snapshot expired
/// queue on `refresh_guard`; whoever gets it first performs the fetch and the
/// rest adopt its outcome instead of fetching again.
pub struct PriceCache {
    registry: Arc<SymbolRegistry>,
    fetcher: Arc<dyn PriceFetcher>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entry: RwLock<CacheEntry>,
    refresh_guard: Mutex<()>,
}

impl PriceCache {
    pub fn new(registry: Arc<SymbolRegistry>, fetcher: Arc<dyn PriceFetcher>, ttl: Duration) -> Self {
        PriceCache {
            registry,
            fetcher,
            clock: Arc::new(SystemClock),
            ttl,
            entry: RwLock::new(CacheEntry {
                snapshot: None,
                attempts: 0,
                last_error: None,
            }),
            refresh_guard: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn state(&self) -> CacheState {
        let entry = self.entry.read().await;
        match &entry.snapshot {
            None => CacheState::Empty,
            Some(s) if self.is_fresh(s) => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        }
    }

    pub async fn snapshot(&self) -> Option<Arc<PriceSnapshot>> {
        self.entry.read().await.snapshot.clone()
    }

    pub fn snapshot_age(&self, snapshot: &PriceSnapshot) -> Duration {
        self.clock.now().saturating_duration_since(snapshot.fetched_at)
    }

    pub async fn get_prices(&self) -> Result<CacheRead> {
        let observed = {
            let entry = self.entry.read().await;
            if let Some(snapshot) = entry.snapshot.as_ref().filter(|s| self.is_fresh(s)) {
                CACHE_HITS.inc();
                return Ok(CacheRead::Hit(Arc::clone(snapshot)));
            }
            entry.attempts
        };
        CACHE_MISSES.inc();

        let _guard = self.refresh_guard.lock().await;
        {
            let entry = self.entry.read().await;
            if entry.attempts != observed {
                return self.adopt(&entry);
            }
        }

        self.refresh().await
    }

    fn is_fresh(&self, snapshot: &PriceSnapshot) -> bool {
        self.snapshot_age(snapshot) < self.ttl
    }

    /// Outcome of a refresh that completed while this caller was queued.
    fn adopt(&self, entry: &CacheEntry) -> Result<CacheRead> {
        match (&entry.last_error, &entry.snapshot) {
            (None, Some(snapshot)) => Ok(CacheRead::Refreshed(Arc::clone(snapshot))),
            (Some(cause), snapshot) => self.fall_back(cause.clone(), snapshot.clone()),
            (None, None) => Err(Error::ProviderUnavailable(
                "refresh completed without a snapshot".to_string(),
            )),
        }
    }

    async fn refresh(&self) -> Result<CacheRead> {
        let ids = self.registry.provider_ids();
        let span = trace_refresh(ids.len());

        async move {
            let outcome = self
                .fetcher
                .fetch_prices(&ids)
                .await
                .map(|raw| normalize(&self.registry, &raw));

            let mut entry = self.entry.write().await;
            entry.attempts += 1;

            match outcome {
                Ok(normalized) => {
                    log_missing(&normalized.missing);
                    MISSING_SYMBOLS.set(normalized.missing.len() as i64);
                    SNAPSHOT_TICKERS.set(normalized.tickers.len() as i64);

                    let snapshot = Arc::new(PriceSnapshot {
                        tickers: normalized.tickers,
                        fetched_at: self.clock.now(),
                        fetched_at_utc: Utc::now(),
                    });
                    tracing::info!(
                        tickers = snapshot.tickers.len(),
                        missing = normalized.missing.len(),
                        "Price snapshot refreshed"
                    );

                    entry.snapshot = Some(Arc::clone(&snapshot));
                    entry.last_error = None;
                    Ok(CacheRead::Refreshed(snapshot))
                }
                Err(cause) => {
                    REFRESH_FAILURES.inc();
                    entry.last_error = Some(cause.clone());
                    self.fall_back(cause, entry.snapshot.clone())
                }
            }
        }
        .instrument(span)
        .await
    }

    fn fall_back(&self, cause: Error, snapshot: Option<Arc<PriceSnapshot>>) -> Result<CacheRead> {
        match snapshot {
            Some(snapshot) if cause.is_recoverable() => {
                STALE_SERVED.inc();
                tracing::warn!(
                    error = %cause,
                    age_secs = self.snapshot_age(&snapshot).as_secs(),
                    "Price refresh failed, serving stale snapshot"
                );
                Ok(CacheRead::Degraded { snapshot, cause })
            }
            _ => {
                tracing::error!(error = %cause, "Price refresh failed with no snapshot to fall back on");
                Err(cause)
            }
        }
    }
}
