use tracing::Span;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Installs the global subscriber. `RUST_LOG` wins over the `info` default.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

pub fn trace_refresh(provider_ids: usize) -> Span {
    tracing::info_span!(
        "price_refresh",
        refresh_id = %Uuid::new_v4(),
        provider_ids,
    )
}

pub fn trace_single_lookup(provider_id: &str) -> Span {
    tracing::info_span!(
        "single_price_lookup",
        provider_id = %provider_id,
    )
}
