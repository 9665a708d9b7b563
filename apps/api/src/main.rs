mod config;
mod errors;
mod generation;
mod intake;
mod llm_client;
mod models;
mod presentation;
mod routes;
mod session;
mod state;
mod sync;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::generator::GeminiScriptGenerator;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::service::SessionService;
use crate::state::AppState;
use crate::sync::webhook::{WebhookClient, WEBHOOK_URL};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing provider key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ProRoteiro v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let generator = Arc::new(GeminiScriptGenerator::new(llm));
    let sync = Arc::new(WebhookClient::new(WEBHOOK_URL));
    info!("Webhook sync target: {WEBHOOK_URL}");

    let state = AppState {
        session: SessionService::new(generator, sync),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
