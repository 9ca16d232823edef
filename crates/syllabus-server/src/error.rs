//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Login attempted with credentials that do not match. Deliberately does
  /// not say which field was wrong.
  #[error("invalid credentials")]
  InvalidCredentials,
  /// A protected route was called without an authenticated session.
  #[error("unauthorized")]
  Unauthorized,
  #[error("session middleware is not installed")]
  SessionMissing,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      Error::InvalidCredentials => {
        (StatusCode::UNAUTHORIZED, "Invalid username or password")
      }
      Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
      Error::SessionMissing => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable")
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
