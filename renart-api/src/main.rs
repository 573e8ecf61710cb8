use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use renart_api::{app, AppState};
use renart_catalog::{CatalogService, GoldPriceService};
use renart_core::{Clock, GoldPriceProvider, SystemClock};
use renart_store::{app_config::Config, load_rings, HttpGoldFeed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "renart_api=debug,renart_catalog=debug,renart_store=debug,tower_http=debug"
                        .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Renart catalog API on port {}", config.server.port);

    let rings = load_rings(config.catalog.data_path.as_deref())
        .context("Failed to load ring catalog")?;

    let provider: Option<Arc<dyn GoldPriceProvider>> = if config.market.enabled {
        let feed = HttpGoldFeed::new(&config.market).context("Failed to build gold feed client")?;
        Some(Arc::new(feed))
    } else {
        tracing::warn!(
            price_per_gram = config.pricing.fallback_price_per_gram,
            "Gold feed disabled, pricing off the fallback constant"
        );
        None
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let gold = GoldPriceService::new(provider, clock.clone(), config.pricing.clone());
    let app = app(AppState::new(CatalogService::new(rings, gold, clock)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
