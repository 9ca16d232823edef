//! Async HTTP client wrapping the syllabus JSON API.

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use syllabus_core::{Subject, SubjectId};

/// Connection settings for the syllabus API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the syllabus JSON REST API.
///
/// Holds a cookie store, so after [`ApiClient::login`] every request rides on
/// the same server session.
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .cookie_store(true)
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// `POST /api/login`
  pub async fn login(&self) -> Result<()> {
    let resp = self
      .client
      .post(self.url("/login"))
      .json(&json!({
        "username": self.config.username,
        "password": self.config.password,
      }))
      .send()
      .await
      .context("POST /login failed")?;

    if resp.status() == StatusCode::UNAUTHORIZED {
      bail!("login failed: invalid username or password");
    }
    if !resp.status().is_success() {
      return Err(anyhow!("POST /login → {}", resp.status()));
    }
    tracing::debug!(username = %self.config.username, "logged in");
    Ok(())
  }

  /// `POST /api/logout`
  pub async fn logout(&self) -> Result<()> {
    let resp = self
      .client
      .post(self.url("/logout"))
      .send()
      .await
      .context("POST /logout failed")?;
    if !resp.status().is_success() {
      return Err(anyhow!("POST /logout → {}", resp.status()));
    }
    Ok(())
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  /// `GET /api/subjects`
  pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
    let resp = self
      .client
      .get(self.url("/subjects"))
      .send()
      .await
      .context("GET /subjects failed")?;
    decode(resp, "GET /subjects").await
  }

  /// `POST /api/subjects`
  pub async fn add_subject(&self, name: &str) -> Result<Subject> {
    let resp = self
      .client
      .post(self.url("/subjects"))
      .json(&json!({ "name": name }))
      .send()
      .await
      .context("POST /subjects failed")?;
    decode(resp, "POST /subjects").await
  }

  /// `PUT /api/subjects/:id`
  pub async fn rename_subject(&self, id: SubjectId, name: &str) -> Result<Subject> {
    let resp = self
      .client
      .put(self.url(&format!("/subjects/{id}")))
      .json(&json!({ "name": name }))
      .send()
      .await
      .with_context(|| format!("PUT /subjects/{id} failed"))?;
    decode(resp, &format!("PUT /subjects/{id}")).await
  }

  /// `DELETE /api/subjects/:id`
  pub async fn remove_subject(&self, id: SubjectId) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/subjects/{id}")))
      .send()
      .await
      .with_context(|| format!("DELETE /subjects/{id} failed"))?;
    let _: serde_json::Value = decode(resp, &format!("DELETE /subjects/{id}")).await?;
    Ok(())
  }
}

/// Turn a response into `T`, or into an error carrying the server's message.
async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  let status = resp.status();
  if status.is_success() {
    return resp.json().await.with_context(|| format!("deserialising {what}"));
  }
  let body: serde_json::Value = resp.json().await.unwrap_or_default();
  let message = body
    .get("error")
    .or_else(|| body.get("message"))
    .and_then(|m| m.as_str())
    .unwrap_or("no details");
  match status {
    StatusCode::UNAUTHORIZED => Err(anyhow!("{what}: not logged in ({message})")),
    StatusCode::NOT_FOUND => Err(anyhow!("{what}: {message}")),
    _ => Err(anyhow!("{what} → {status}: {message}")),
  }
}
