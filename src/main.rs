//! Storefront Analytics - reseller dashboard service

use anyhow::Result;
use storefront_analytics::{api::{self, AppState}, client::OrderClient, config::Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let orders = OrderClient::new(&config)?;
    let port = config.port;
    tracing::info!(upstream = %config.orders_api_url, offset = %config.display_offset, "loaded configuration");

    let app = api::router(AppState::new(config, orders));
    tracing::info!("📊 Storefront analytics listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
