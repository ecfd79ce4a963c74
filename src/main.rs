use axum::Router;
use std::time::Duration;
use confluence::{api, AppState, Config};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confluence=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Starting Confluence on {}:{} (cache TTL override: {:?})",
        config.host, config.port, config.cache_ttl_secs
    );

    let addr = format!("{}:{}", config.host, config.port);
    let purge_interval = Duration::from_secs(config.cache_purge_interval_secs.max(1));
    let state = AppState::new(config);

    // Sweep expired evaluations
    {
        let signal_store = state.signal_store.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(purge_interval).await;
                signal_store.purge_expired();
            }
        });
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(api::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Confluence listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
