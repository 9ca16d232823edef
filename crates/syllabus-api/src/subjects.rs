//! Handlers for `/subjects` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/subjects` | Insertion order, no filtering |
//! | `POST`   | `/subjects` | Body: `{"name":"..."}`; returns 201 + record |
//! | `PUT`    | `/subjects/:id` | Body: `{"name":"..."}`; 404 if not found |
//! | `DELETE` | `/subjects/:id` | Returns `{"success":true}`; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use syllabus_core::{Subject, SubjectId, SubjectRegistry};

use crate::error::ApiError;

/// JSON body accepted by `POST /subjects` and `PUT /subjects/:id`.
///
/// A missing `name` is passed through to the registry as `None`.
#[derive(Debug, Default, Deserialize)]
pub struct SubjectBody {
  pub name: Option<String>,
}

/// Ids that do not parse can never match a subject, so they are reported as
/// not found rather than as a malformed request.
fn parse_id(raw: &str) -> Result<SubjectId, ApiError> {
  raw.parse().map_err(|_| not_found(raw))
}

fn not_found(id: impl std::fmt::Display) -> ApiError {
  ApiError::NotFound(format!("Subject {id} not found"))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /subjects`
pub async fn list<R>(
  State(registry): State<Arc<R>>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  R: SubjectRegistry,
{
  let subjects = registry
    .list_subjects()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(subjects))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /subjects` — body: `{"name":"..."}`
pub async fn create<R>(
  State(registry): State<Arc<R>>,
  body: Result<Json<SubjectBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  R: SubjectRegistry,
{
  let Json(body) = body?;
  let subject = registry
    .add_subject(body.name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(subject)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /subjects/:id` — body: `{"name":"..."}`
pub async fn update<R>(
  State(registry): State<Arc<R>>,
  Path(raw_id): Path<String>,
  body: Result<Json<SubjectBody>, JsonRejection>,
) -> Result<Json<Subject>, ApiError>
where
  R: SubjectRegistry,
{
  let id = parse_id(&raw_id)?;
  let Json(body) = body?;
  let subject = registry
    .rename_subject(id, body.name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(subject))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /subjects/:id` — acknowledges with `{"success":true}`, not the
/// removed record.
pub async fn delete_one<R>(
  State(registry): State<Arc<R>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  R: SubjectRegistry,
{
  let id = parse_id(&raw_id)?;
  registry
    .remove_subject(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(json!({ "success": true })))
}
