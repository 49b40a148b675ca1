//! Video summary notes - companion server for video watch pages.
//!
//! Serves a watch page with the summary panel and notes widget, plus the
//! all-notes, mind map and status pages, all backed by the summary backend.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vidnotes::{handlers, AppState, Config, BACKEND_URL, BIND_ADDR, DB_PATH, REQUEST_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "vidnotes")]
#[command(about = "Video summaries and notes next to the player")]
#[command(version)]
struct Cli {
    /// Summary backend base URL
    #[arg(long, env = "VIDNOTES_BACKEND_URL", default_value = BACKEND_URL)]
    backend_url: String,

    /// Address the companion pages are served on
    #[arg(long, env = "VIDNOTES_BIND", default_value = BIND_ADDR)]
    bind: String,

    /// Local store holding the client id
    #[arg(long, env = "VIDNOTES_DB", default_value = DB_PATH)]
    db: PathBuf,

    /// Use the dark palette
    #[arg(long, env = "VIDNOTES_DARK")]
    dark: bool,

    /// Backend request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    timeout: u64,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config {
        backend_url: cli.backend_url,
        bind_addr: cli.bind,
        db_path: cli.db,
        dark_mode: cli.dark,
        request_timeout: Duration::from_secs(cli.timeout),
    };
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config).context("failed to initialize application state")?);

    let app = Router::new()
        .route("/", get(handlers::index))
        // Watch page
        .route("/watch", get(handlers::watch))
        .route("/watch/retry", post(handlers::retry_summary))
        .route("/watch/notes", post(handlers::save_note))
        // Standalone pages
        .route("/notes", get(handlers::all_notes))
        .route("/mind-map", get(handlers::mind_map))
        // JSON
        .route("/api/summary/{video_id}", get(handlers::api_summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", bind_addr))?;

    info!("Companion pages at http://{}", bind_addr);
    info!("Summary backend: {}", state.backend.base_url());
    if !state.backend.ping().await {
        warn!("summary backend is not reachable yet");
    }

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
