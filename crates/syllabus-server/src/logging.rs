//! Per-request log line: method, URI, session, and registry state.

use std::sync::Arc;

use axum::{
  extract::{Request, State},
  middleware::Next,
  response::Response,
};
use syllabus_core::SubjectRegistry;

use crate::session::CurrentSession;

/// Log every request before it is handled. The full collection is only
/// emitted at DEBUG.
pub async fn log_request<R>(
  State(registry): State<Arc<R>>,
  req: Request,
  next: Next,
) -> Response
where
  R: SubjectRegistry + 'static,
{
  let method  = req.method().clone();
  let uri     = req.uri().clone();
  let session = req
    .extensions()
    .get::<CurrentSession>()
    .map(|c| c.session.snapshot());

  match registry.list_subjects().await {
    Ok(subjects) => {
      tracing::info!(%method, %uri, ?session, subjects = subjects.len(), "request");
      tracing::debug!(?subjects, "registry state");
    }
    Err(e) => {
      tracing::warn!(%method, %uri, ?session, error = %e, "request; registry unavailable");
    }
  }

  next.run(req).await
}
