//! Runtime configuration: an optional TOML file layered under `SYLLABUS_*`
//! environment variables, with a default for every key.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// Built frontend bundle, served for every non-API path.
  pub static_dir:       PathBuf,
  pub session_ttl_secs: u64,
  pub cookie_secure:    bool,
  pub auth_username:    String,
  pub auth_password:    String,
  /// Browser origin allowed to call the API with credentials, if any.
  pub cors_origin:      Option<String>,
}

impl ServerConfig {
  /// Read `path` (if it exists) and the environment on top of the defaults.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::builder()?
      .add_source(File::from(path).required(false))
      .add_source(Environment::with_prefix("SYLLABUS"))
      .build()?
      .try_deserialize()
  }

  fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3000)?
      .set_default("static_dir", "frontend/build")?
      .set_default("session_ttl_secs", 3600)?
      .set_default("cookie_secure", false)?
      .set_default("auth_username", "admin")?
      .set_default("auth_password", "123")
  }

  pub fn session_ttl(&self) -> TimeDelta {
    i64::try_from(self.session_ttl_secs)
      .ok()
      .and_then(TimeDelta::try_seconds)
      .unwrap_or(TimeDelta::MAX)
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             3000,
      static_dir:       PathBuf::from("frontend/build"),
      session_ttl_secs: 3600,
      cookie_secure:    false,
      auth_username:    "admin".to_string(),
      auth_password:    "123".to_string(),
      cors_origin:      None,
    }
  }
}
