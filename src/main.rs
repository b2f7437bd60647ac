//! Pharmacy Storefront - catalog and monthly offers service

use anyhow::Result;
use pharmacy_storefront::{
    catalog::{CatalogSource, Storefront},
    config::AppConfig,
    http::{router, AppState},
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::debug!(?config, "loaded configuration");

    let source = match &config.database_url {
        Some(url) => CatalogSource::Database(PgPoolOptions::new().max_connections(config.db_max_connections).connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, serving the built-in catalog only");
            CatalogSource::Fallback
        }
    };
    let storefront = Storefront::new(source).with_offer_count(config.offer_count);
    tracing::info!(source = storefront.source().describe(), offers = storefront.offer_count(), "catalog ready");

    let state = AppState { storefront };
    let app = router(state);

    tracing::info!("Pharmacy storefront listening on {}", config.bind_addr);
    axum::serve(tokio::net::TcpListener::bind(config.bind_addr).await?, app).await?;
    Ok(())
}
