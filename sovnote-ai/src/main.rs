//! sovnote-ai - Note Analyzer microservice
//!
//! **Module Identity:**
//! - Name: sovnote-ai (Note Analyzer)
//! - Port: 8000 (all interfaces)
//!
//! Accepts a study note and topic on `POST /analyze`, classifies the note,
//! fetches a Wikipedia summary of the topic, and scores how completely the
//! note covers it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sovnote_ai::config::{AiConfig, CliOverrides, EmbedderBackend};
use sovnote_ai::services::NoteAnalyzer;
use sovnote_ai::{build_router, AppState};

/// Command-line arguments for sovnote-ai
#[derive(Parser, Debug)]
#[command(name = "sovnote-ai")]
#[command(about = "Note Analyzer microservice for SovNote")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config_dir>/sovnote/sovnote-ai.toml)
    #[arg(short, long, env = "SOVNOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "SOVNOTE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SOVNOTE_PORT")]
    port: Option<u16>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "SOVNOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Wikipedia Action API endpoint
    #[arg(long, env = "SOVNOTE_WIKIPEDIA_URL")]
    wikipedia_url: Option<String>,

    /// Embedding backend
    #[arg(long, value_enum, env = "SOVNOTE_EMBEDDER")]
    embedder: Option<EmbedderBackend>,

    /// Base URL of an OpenAI-compatible embeddings API
    #[arg(long, env = "SOVNOTE_EMBEDDER_URL")]
    embedder_url: Option<String>,

    /// Embedding model name for the HTTP backend
    #[arg(long, env = "SOVNOTE_EMBEDDER_MODEL")]
    embedder_model: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
            wikipedia_url: self.wikipedia_url.clone(),
            embedder: self.embedder,
            embedder_url: self.embedder_url.clone(),
            embedder_model: self.embedder_model.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AiConfig::load(args.config.as_deref(), args.overrides())
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any slow startup work
    info!(
        "Starting SovNote Note Analyzer (sovnote-ai) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Model loading blocks (and may download on first run)
    let analyzer_config = config.clone();
    let analyzer = tokio::task::spawn_blocking(move || NoteAnalyzer::from_config(&analyzer_config))
        .await
        .context("Analyzer initialization task failed")?
        .context("Failed to initialize note analyzer")?;
    let state = AppState::new(analyzer);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
