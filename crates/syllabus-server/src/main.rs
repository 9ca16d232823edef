//! syllabus server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus any
//! `SYLLABUS_*` environment variables, seeds an in-memory registry, and serves
//! the JSON API and the frontend over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use syllabus_server::{AppState, ServerConfig};
use syllabus_store_memory::MemoryStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Syllabus subject registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

  if !server_cfg.static_dir.is_dir() {
    tracing::warn!(
      dir = %server_cfg.static_dir.display(),
      "frontend directory not found; non-API paths will return 404"
    );
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState::new(MemoryStore::seeded(), server_cfg);
  let app = syllabus_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
