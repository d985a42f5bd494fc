mod analysis;
mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::pipeline::AnalysisService;
use crate::analysis::staging::StagingArea;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::ChatCompletionsClient;
use crate::profile::store::PgUserStore;
use crate::routes::build_router;
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

    info!("Starting resume analysis API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (user profiles)
    let db = create_pool(&config.database_url)?;

    // Initialize LLM client
    let llm = ChatCompletionsClient::new(config.llm_base_url.clone(), config.llm_api_key.clone())?;
    match &config.llm_model {
        Some(model) => info!("LLM client initialized (model: {model})"),
        None => warn!("LLM_MODEL (or MODEL) is not set; /generate will fail"),
    }
    if config.llm_api_key.is_none() {
        warn!("GROQ_API_KEY is not set; /generate will fail until it is configured");
    }

    let staging = StagingArea::new(config.staging_dir.clone());
    info!("Staging uploads in {}", staging.dir().display());

    // Build app state
    let state = AppState {
        analysis: AnalysisService::new(staging, Arc::new(llm), config.llm_model.clone()),
        users: Arc::new(PgUserStore::new(db)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
