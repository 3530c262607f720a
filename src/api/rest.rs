use axum::{
    Router,
    routing::get,
    extract::{Path, State, Json},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::error::Result;
use crate::interfaces::price_fetcher::PriceFetcher;
use crate::observability::metrics;
use crate::price_infra::cache::{CacheState, PriceCache};
use crate::price_infra::lookup::single_price;
use crate::price_infra::registry::SymbolRegistry;
use crate::types::ticker::PriceTicker;

pub struct ApiState {
    pub cache: Arc<PriceCache>,
    pub fetcher: Arc<dyn PriceFetcher>,
    pub registry: Arc<SymbolRegistry>,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        .route("/api/markets", get(get_markets))
        .route("/api/realtime-prices", get(get_markets))
        .route("/api/markets/:provider_id", get(get_market))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    cache: CacheState,
    snapshot_age_secs: Option<u64>,
    fetched_at: Option<String>,
}

async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let snapshot = state.cache.snapshot().await;

    Json(HealthResponse {
        status: "ok",
        cache: state.cache.state().await,
        snapshot_age_secs: snapshot.as_ref().map(|s| state.cache.snapshot_age(s).as_secs()),
        fetched_at: snapshot.as_ref().map(|s| s.fetched_at_utc.to_rfc3339()),
    })
}

async fn prometheus_metrics() -> impl IntoResponse {
    match metrics::gather_text() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                String::new(),
            )
        }
    }
}

#[derive(Serialize)]
struct MarketsResponse {
    success: bool,
    data: Vec<PriceTicker>,
    /// True only when an expired snapshot is served after a failed refresh.
    cached: bool,
}

async fn get_markets(State(state): State<Arc<ApiState>>) -> Result<Json<MarketsResponse>> {
    let read = state.cache.get_prices().await?;

    Ok(Json(MarketsResponse {
        success: true,
        cached: read.is_degraded(),
        data: read.snapshot().tickers.clone(),
    }))
}

#[derive(Serialize)]
struct MarketResponse {
    success: bool,
    data: PriceTicker,
}

async fn get_market(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<String>,
) -> Result<Json<MarketResponse>> {
    let ticker = single_price(state.fetcher.as_ref(), &state.registry, &provider_id).await?;

    Ok(Json(MarketResponse {
        success: true,
        data: ticker,
    }))
}
