mod analysis;
mod config;
mod dashboard;
mod errors;
mod ingest;
mod llm_client;
mod models;
mod report;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::provider::GeminiAnalysisProvider;
use crate::config::Config;
use crate::dashboard::restore_session;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::create_store;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillGap API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence (Redis when configured, in-memory otherwise)
    let store = create_store(config.redis_url.as_deref())?;
    let session = restore_session(store.as_ref()).await;

    // Model provider. A missing key is reported on the first analysis, not here.
    let llm = LlmClient::new(config.api_key.clone(), config.gemini_base_url.clone())?;
    if !llm.has_api_key() {
        warn!("API_KEY is not set; analysis requests will fail until it is configured");
    }
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let provider = Arc::new(GeminiAnalysisProvider::new(llm));

    let state = AppState::new(provider, store, session);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
