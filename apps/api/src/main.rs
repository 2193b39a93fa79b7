mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod scouting;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scouting::analyze::Scouting;
use crate::scouting::scorer::{BoundedScorer, LlmTextScorer, TextScorer};
use crate::scouting::vocabulary::Vocabulary;
use crate::state::AppState;
use crate::store::JsonFileStore;

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

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    // Vocabulary is loaded once and shared read-only from here on.
    let vocabulary = match &config.vocabulary_path {
        Some(path) => Vocabulary::from_json_file(path)
            .with_context(|| format!("Failed to load vocabulary from {}", path.display()))?,
        None => Vocabulary::builtin(),
    };
    info!("Vocabulary loaded: {} canonical tags", vocabulary.len());

    // Model tier is optional; its deadline is owned here, not by the pipeline.
    let scorer: Option<Arc<dyn TextScorer>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!(
                "Model tier enabled (model: {}, timeout: {:?})",
                llm_client::MODEL,
                config.scorer_timeout
            );
            Some(Arc::new(BoundedScorer::new(
                LlmTextScorer(llm),
                config.scorer_timeout,
            )))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; tag inference starts at the keyword tier");
            None
        }
    };

    let store = JsonFileStore::new(config.profiles_path.clone());
    info!("Profile store: {}", store.path().display());

    let state = AppState {
        scouting: Scouting::new(Arc::new(vocabulary), scorer, config.inference),
        store: Arc::new(store),
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
