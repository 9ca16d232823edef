//! Login, logout, and the gate in front of every protected route.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Request, State, rejection::JsonRejection},
  http::header,
  middleware::Next,
  response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
  error::Error,
  session::{CurrentSession, SessionStore},
};

// ─── Credentials ──────────────────────────────────────────────────────────────

/// Decides whether a username/password pair may log in.
pub trait CredentialVerifier: Send + Sync {
  fn verify(&self, username: &str, password: &str) -> bool;
}

/// The single credential pair accepted by this server, compared verbatim.
#[derive(Clone)]
pub struct FixedCredential {
  pub username: String,
  pub password: String,
}

impl CredentialVerifier for FixedCredential {
  fn verify(&self, username: &str, password: &str) -> bool {
    username == self.username && password == self.password
  }
}

/// State shared by the login/logout handlers and the gate.
#[derive(Clone)]
pub struct AuthState {
  pub sessions: Arc<SessionStore>,
  pub verifier: Arc<dyn CredentialVerifier>,
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /login`. Missing fields never match.
#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
  pub username: Option<String>,
  pub password: Option<String>,
}

/// `POST /login` — binds the identity to the caller's session.
///
/// A body that is missing or not JSON is treated like wrong credentials.
pub async fn login(
  State(auth): State<AuthState>,
  current: CurrentSession,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Response, Error> {
  let LoginBody { username, password } = body.map(|Json(b)| b).unwrap_or_default();
  let (Some(username), Some(password)) = (username, password) else {
    tracing::warn!("login rejected: incomplete credentials");
    return Err(Error::InvalidCredentials);
  };
  if !auth.verifier.verify(&username, &password) {
    tracing::warn!(%username, "login rejected");
    return Err(Error::InvalidCredentials);
  }

  let session = auth
    .sessions
    .authenticate(&current.session.id, username.clone())
    .await;
  tracing::info!(%username, session = ?session.id, "login");

  let mut resp = Json(json!({ "message": "Login successful" })).into_response();
  if let Some(cookie) = auth.sessions.set_cookie(&session) {
    resp.headers_mut().insert(header::SET_COOKIE, cookie);
  }
  Ok(resp)
}

/// `POST /logout` — always succeeds, whether or not anyone was logged in.
pub async fn logout(State(auth): State<AuthState>, current: CurrentSession) -> Response {
  let existed = auth.sessions.destroy(&current.session.id).await;
  tracing::info!(session = ?current.session.id, existed, "logout");
  (
    [(header::SET_COOKIE, auth.sessions.clear_cookie())],
    Json(json!({ "message": "Logged out" })),
  )
    .into_response()
}

// ─── Gate ─────────────────────────────────────────────────────────────────────

/// Route middleware: lets the request through only if its session is
/// authenticated. Otherwise responds 401 without running the handler.
pub async fn require_authenticated(
  State(auth): State<AuthState>,
  current: CurrentSession,
  req: Request,
  next: Next,
) -> Result<Response, Error> {
  if !auth.sessions.is_authenticated(&current.session.id).await {
    tracing::debug!(uri = %req.uri(), "rejected unauthenticated request");
    return Err(Error::Unauthorized);
  }
  Ok(next.run(req).await)
}
