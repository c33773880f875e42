mod access;
mod config;
mod errors;
mod export;
mod extract;
mod matching;
mod models;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::access::{AccessGate, SharedSecretGate};
use crate::config::Config;
use crate::extract::DocumentExtractor;
use crate::matching::catalog::KeywordCatalog;
use crate::matching::jd_analyzer::JdAnalyzer;
use crate::routes::build_router;
use crate::session::store::{spawn_idle_sweeper, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Keyword catalog: external JSON file when configured, built-in list otherwise
    let catalog = KeywordCatalog::load(config.catalog_path.as_deref())
        .context("Failed to load keyword catalog")?;
    let analyzer = JdAnalyzer::new(catalog).context("Failed to build JD analyzer")?;

    let extractor = DocumentExtractor::new().context("Failed to build document extractor")?;

    // Access gate for the history view
    let access_gate: Arc<dyn AccessGate> =
        Arc::new(SharedSecretGate::new(config.hiring_manager_secret.clone()));
    info!("Access gate initialized ({})", access_gate.name());

    info!(
        "Default display mode: {}, upload limit: {} bytes",
        config.display_mode, config.max_upload_bytes
    );

    let sessions = SessionStore::new();
    let _sweeper = spawn_idle_sweeper(
        sessions.clone(),
        config.session_idle_ttl,
        config.session_sweep_interval,
    );
    info!(
        "Idle sessions evicted after {}s (checked every {}s)",
        config.session_idle_ttl.as_secs(),
        config.session_sweep_interval.as_secs()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        analyzer: Arc::new(analyzer),
        extractor: Arc::new(extractor),
        sessions,
        access_gate,
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
