use anyhow::Context;
use market_feed::api::rest::create_router;
use market_feed::build_state;
use market_feed::config::loader::AppConfig;
use market_feed::observability::metrics::register_metrics;
use market_feed::observability::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("loading configuration")?;

    init_tracing(config.log.json);
    register_metrics();

    if config.provider.api_key.is_none() {
        tracing::warn!("No provider API key configured; price requests will fail until one is set");
    }

    let state = build_state(&config).context("building price service")?;
    tracing::info!(
        symbols = state.registry.len(),
        ttl_secs = config.cache.ttl_secs,
        "Price service ready"
    );

    let app = create_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping");
}
