//! Café voice ordering assistant
//!
//! Serves the calling UI and proxies call, agent and conversation-flow
//! requests to the hosted voice-agent API.

mod api;
mod config;
mod flow;
mod order;
mod voice_api;

use api::{create_router, AppState};
use config::AppConfig;
use order::PhraseOrderExtractor;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_api::{LoggingVoiceApi, RetellClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; real deployments set the environment
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cafe_voice=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env();

    let missing = config.missing_secrets();
    if missing.is_empty() {
        tracing::info!(base_url = %config.retell.base_url, "Voice API configured");
    } else {
        tracing::warn!(
            missing = ?missing,
            "Voice API settings incomplete; affected endpoints will return 500"
        );
    }

    let client = RetellClient::new(&config.retell)?;
    let voice_api = Arc::new(LoggingVoiceApi::new(Arc::new(client)));
    let orders = Arc::new(PhraseOrderExtractor::cafe()?);

    let state = AppState::new(voice_api, orders, config.agents.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Café voice server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
