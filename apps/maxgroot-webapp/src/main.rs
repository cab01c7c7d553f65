use maxgroot_webapp::{build_router, config::WebappConfig, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maxgroot_webapp=debug,maxgroot_auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = WebappConfig::load()?;
    tracing::info!("Mini App backend starting...");
    tracing::info!("Billing API URL: {}", config.api_url);
    tracing::info!("Mini App bundle: {}", config.mini_app_dir.display());
    if config.bot_secret().is_none() {
        tracing::warn!(
            "BOT_TOKEN not configured: reduced-trust mode, launch data is NOT verified \
             and purchase/topup/promo routes are refused"
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let state = AppState::new(config)?;
    let app = build_router(state);

    tracing::info!("Webapp listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
