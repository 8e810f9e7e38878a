mod archive;
mod config;
mod errors;
mod extraction;
mod lifecycle;
mod llm_client;
mod record;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::structured::EXTRACTION_TEMPERATURE;
use crate::extraction::{DocumentTextExtractor, LlmExtractor};
use crate::lifecycle::SessionStore;
use crate::llm_client::LlmClient;
use crate::render::RenderOptions;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting standardizer v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm =
        LlmClient::new(config.anthropic_api_key.clone())?.with_temperature(EXTRACTION_TEMPERATURE);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let settings = config.registry_settings();
    info!(
        "Registry settings: max {} records per session, edit policy {:?}, idle timeout {}s",
        settings.max_records, settings.edit_policy, config.session_idle_secs
    );

    // Build app state
    let state = AppState {
        sessions: Arc::new(SessionStore::new(settings, config.session_idle_ttl())),
        text_extractor: Arc::new(DocumentTextExtractor),
        extractor: Arc::new(LlmExtractor::new(llm)),
        render_options: RenderOptions {
            brand_name: config.brand_name.clone(),
        },
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
