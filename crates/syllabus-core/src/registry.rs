//! The `SubjectRegistry` trait.
//!
//! Implemented by storage backends (e.g. `syllabus-store-memory`). The HTTP
//! layers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::subject::{Subject, SubjectId};

/// Abstraction over the ordered, mutable collection of subjects and its id
/// counter.
///
/// Ids are unique and strictly increasing in creation order; a removed id is
/// never handed out again. Listing returns subjects in insertion order.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SubjectRegistry: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All subjects in insertion order.
  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// Assign the next id, append a subject with `name`, and return it.
  fn add_subject(
    &self,
    name: Option<String>,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  /// Replace the name of subject `id` in place. Returns `None` if no such
  /// subject exists.
  fn rename_subject(
    &self,
    id: SubjectId,
    name: Option<String>,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// Remove subject `id`, returning it. Returns `None` if no such subject
  /// exists.
  fn remove_subject(
    &self,
    id: SubjectId,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;
}
