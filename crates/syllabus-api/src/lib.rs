//! JSON REST API for the subject registry.
//!
//! Exposes an axum [`Router`] backed by any [`SubjectRegistry`].
//! Sessions, auth, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", syllabus_api::api_router(registry.clone()))
//! ```

pub mod error;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use syllabus_core::SubjectRegistry;

pub use error::ApiError;

/// Build a fully-materialised API router for `registry`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R>(registry: Arc<R>) -> Router<()>
where
  R: SubjectRegistry + 'static,
{
  Router::new()
    .route("/subjects", get(subjects::list::<R>).post(subjects::create::<R>))
    .route(
      "/subjects/{id}",
      put(subjects::update::<R>).delete(subjects::delete_one::<R>),
    )
    .with_state(registry)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use syllabus_store_memory::MemoryStore;
  use tower::ServiceExt as _;

  async fn send(
    registry: &Arc<MemoryStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(registry.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
  }

  #[tokio::test]
  async fn list_returns_seed_in_order() {
    let r = Arc::new(MemoryStore::seeded());
    let (status, body) = send(&r, "GET", "/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body,
      json!([
        {"id": 1, "name": "Toán"},
        {"id": 2, "name": "Văn"},
        {"id": 3, "name": "Anh"},
      ])
    );
  }

  #[tokio::test]
  async fn create_returns_201_and_record() {
    let r = Arc::new(MemoryStore::seeded());
    let (status, body) =
      send(&r, "POST", "/subjects", Some(json!({"name": "Lý"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 4, "name": "Lý"}));
  }

  #[tokio::test]
  async fn create_without_name_stores_nameless_record() {
    let r = Arc::new(MemoryStore::seeded());
    let (status, body) = send(&r, "POST", "/subjects", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"id": 4}));
  }

  #[tokio::test]
  async fn create_with_non_json_body_is_400() {
    let r = Arc::new(MemoryStore::seeded());
    let req = Request::builder()
      .method("POST")
      .uri("/subjects")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("not json"))
      .unwrap();
    let resp = api_router(r.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(r.list_subjects().await.unwrap().len(), 3);
  }

  #[tokio::test]
  async fn update_existing_returns_record() {
    let r = Arc::new(MemoryStore::seeded());
    let (status, body) =
      send(&r, "PUT", "/subjects/2", Some(json!({"name": "Văn học"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 2, "name": "Văn học"}));
  }

  #[tokio::test]
  async fn update_missing_is_404_with_error_field() {
    let r = Arc::new(MemoryStore::seeded());
    let (status, body) =
      send(&r, "PUT", "/subjects/99", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("error").is_some(), "body: {body}");
  }

  #[tokio::test]
  async fn non_numeric_id_is_404() {
    let r = Arc::new(MemoryStore::seeded());
    let (status, _) = send(&r, "DELETE", "/subjects/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_twice_yields_200_then_404() {
    let r = Arc::new(MemoryStore::seeded());
    let (first, body) = send(&r, "DELETE", "/subjects/1", None).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (second, _) = send(&r, "DELETE", "/subjects/1", None).await;
    assert_eq!(second, StatusCode::NOT_FOUND);
  }
}
