mod config;
mod errors;
mod extract;
mod llm_client;
mod models;
mod routes;
mod screening;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{GeminiClient, ModelGateway};
use crate::routes::build_router;
use crate::screening::prompts::PromptStore;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("screener_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener API v{}", env!("CARGO_PKG_VERSION"));

    // A missing key is not fatal at boot: it fails at the first model call.
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; model calls will fail until it is configured");
    }

    let gateway: Arc<dyn ModelGateway> =
        Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    info!("Model gateway initialized");

    let prompts = PromptStore::new(config.prompts_dir.clone());

    let store = SessionStore::new(config.data_dir.clone());
    store.ensure_dir()?;

    let state = AppState {
        gateway,
        prompts,
        store,
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
