//! HTTP server for the subject registry.
//!
//! Composes the session layer, the login/logout endpoints, the auth gate in
//! front of [`syllabus_api`], request logging, and the single-page frontend
//! served for every path the API does not claim.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use config::ServerConfig;
pub use error::Error;

use std::{path::Path, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
  middleware,
  routing::post,
};
use syllabus_core::SubjectRegistry;
use tower_http::{
  cors::CorsLayer,
  services::{ServeDir, ServeFile},
  trace::TraceLayer,
};

use auth::{AuthState, FixedCredential};
use session::SessionStore;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the router.
#[derive(Clone)]
pub struct AppState<R: SubjectRegistry> {
  pub registry: Arc<R>,
  pub config:   Arc<ServerConfig>,
  pub auth:     AuthState,
}

impl<R: SubjectRegistry> AppState<R> {
  /// Fresh sessions and the configured credential around `registry`.
  pub fn new(registry: R, config: ServerConfig) -> Self {
    let sessions =
      SessionStore::new(config.session_ttl()).with_secure_cookie(config.cookie_secure);
    let verifier = FixedCredential {
      username: config.auth_username.clone(),
      password: config.auth_password.clone(),
    };
    Self {
      registry: Arc::new(registry),
      config:   Arc::new(config),
      auth:     AuthState {
        sessions: Arc::new(sessions),
        verifier: Arc::new(verifier),
      },
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application [`Router`].
///
/// API routes are registered before the frontend fallback, so any unmatched
/// path, including a mistyped `/api/...` one, receives the frontend's
/// `index.html` rather than a 404.
pub fn router<R>(state: AppState<R>) -> Router
where
  R: SubjectRegistry + 'static,
{
  let protected = syllabus_api::api_router(state.registry.clone()).route_layer(
    middleware::from_fn_with_state(state.auth.clone(), auth::require_authenticated),
  );

  let sessions = Router::new()
    .route("/login", post(auth::login))
    .route("/logout", post(auth::logout))
    .with_state(state.auth.clone());

  let app = Router::new()
    .nest("/api", sessions.merge(protected))
    .fallback_service(frontend(&state.config.static_dir))
    .layer(middleware::from_fn_with_state(
      state.registry.clone(),
      logging::log_request::<R>,
    ))
    .layer(middleware::from_fn_with_state(
      state.auth.sessions.clone(),
      session::attach_session,
    ))
    .layer(TraceLayer::new_for_http());

  match state.config.cors_origin.as_deref().and_then(cors) {
    Some(layer) => app.layer(layer),
    None => app,
  }
}

/// Static files from `dir`, with `index.html` for anything not found.
fn frontend(dir: &Path) -> ServeDir<ServeFile> {
  ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

/// Credentialed CORS for a single browser origin.
fn cors(origin: &str) -> Option<CorsLayer> {
  let origin = HeaderValue::from_str(origin)
    .inspect_err(|e| tracing::warn!(%origin, "ignoring cors_origin: {e}"))
    .ok()?;
  Some(
    CorsLayer::new()
      .allow_origin(origin)
      .allow_credentials(true)
      .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
      .allow_headers([header::CONTENT_TYPE]),
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────
