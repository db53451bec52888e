mod coaching;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod market;
mod models;
mod routes;
mod session;
mod state;
mod transcription;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Generation model: {}, transcription model: {}",
        llm_client::MODEL,
        transcription::TRANSCRIPTION_MODEL
    );
    if !config.market_context_configured() {
        warn!("GOOGLE_CSE_API_KEY / GOOGLE_CSE_CX not set; answers will have no market context");
    }
    if config.case_keywords_fell_back {
        warn!("CASE_KEYWORDS has no usable entries, using the built-in list");
    }
    info!(
        "Case question keywords: {}",
        config.case_keywords.as_slice().join(", ")
    );

    let state = AppState::from_config(&config);
    state.sessions.spawn_eviction(session::EVICTION_INTERVAL);
    info!(
        "Idle sessions expire after {}s",
        config.session_idle_ttl.as_secs()
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
