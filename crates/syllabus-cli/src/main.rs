//! `syllabus` — command-line client for the syllabus server.
//!
//! Every invocation logs in, performs one action on the same session, and logs
//! out again.
//!
//! # Usage
//!
//! ```
//! syllabus --user admin --password 123 list
//! syllabus --config ~/.config/syllabus/config.toml add "Hoá"
//! syllabus rename 2 "Văn học"
//! syllabus remove 1
//! ```

mod client;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use syllabus_core::{Subject, SubjectId};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "syllabus", about = "Manage subjects on a syllabus server")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the syllabus server (default: http://localhost:3000).
  #[arg(long, env = "SYLLABUS_URL")]
  url: Option<String>,

  /// Login username.
  #[arg(long, env = "SYLLABUS_USER")]
  user: Option<String>,

  /// Login password (plaintext).
  #[arg(long, env = "SYLLABUS_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print every subject, one per line.
  List,
  /// Create a subject.
  Add { name: String },
  /// Change the name of an existing subject.
  Rename { id: SubjectId, name: String },
  /// Delete a subject.
  Remove { id: SubjectId },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:3000".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;
  client.login().await?;

  // Log out even when the action fails.
  let result = run(&client, args.command).await;
  if let Err(e) = client.logout().await {
    tracing::warn!("logout failed: {e:#}");
  }
  result
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::List => {
      for subject in client.list_subjects().await? {
        print_subject(&subject);
      }
    }
    Command::Add { name } => print_subject(&client.add_subject(&name).await?),
    Command::Rename { id, name } => print_subject(&client.rename_subject(id, &name).await?),
    Command::Remove { id } => {
      client.remove_subject(id).await?;
      println!("removed {id}");
    }
  }
  Ok(())
}

fn print_subject(subject: &Subject) {
  println!("{}\t{}", subject.id, subject.name.as_deref().unwrap_or(""));
}
