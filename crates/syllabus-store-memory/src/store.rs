//! [`MemoryStore`] — the in-memory implementation of [`SubjectRegistry`].

use std::{convert::Infallible, sync::Arc};

use syllabus_core::{Subject, SubjectId, SubjectRegistry};
use tokio::sync::Mutex;

/// Names of the records a fresh server starts with, assigned ids 1..=3.
pub const SEED_SUBJECTS: [&str; 3] = ["Toán", "Văn", "Anh"];

// ─── Store ───────────────────────────────────────────────────────────────────

/// The subject collection plus the next id to hand out.
///
/// Cloning is cheap; clones share the same collection.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

struct Inner {
  subjects: Vec<Subject>,
  next_id:  SubjectId,
}

impl Default for Inner {
  fn default() -> Self {
    Self { subjects: Vec::new(), next_id: 1 }
  }
}

impl MemoryStore {
  /// An empty store whose first subject gets id 1.
  pub fn new() -> Self {
    Self::default()
  }

  /// A store holding [`SEED_SUBJECTS`]; the next created subject gets id 4.
  pub fn seeded() -> Self {
    Self::with_names(SEED_SUBJECTS)
  }

  /// A store holding one subject per name, numbered from 1 in order.
  pub fn with_names<I, N>(names: I) -> Self
  where
    I: IntoIterator<Item = N>,
    N: Into<String>,
  {
    let subjects: Vec<Subject> = names
      .into_iter()
      .zip(1..)
      .map(|(name, id)| Subject::new(id, name))
      .collect();
    let next_id = subjects.len() as SubjectId + 1;
    Self {
      inner: Arc::new(Mutex::new(Inner { subjects, next_id })),
    }
  }
}

// ─── SubjectRegistry impl ────────────────────────────────────────────────────

impl SubjectRegistry for MemoryStore {
  type Error = Infallible;

  async fn list_subjects(&self) -> Result<Vec<Subject>, Infallible> {
    Ok(self.inner.lock().await.subjects.clone())
  }

  async fn add_subject(&self, name: Option<String>) -> Result<Subject, Infallible> {
    let mut inner = self.inner.lock().await;
    let subject = Subject { id: inner.next_id, name };
    inner.next_id += 1;
    inner.subjects.push(subject.clone());
    tracing::debug!(id = subject.id, "subject added");
    Ok(subject)
  }

  async fn rename_subject(
    &self,
    id: SubjectId,
    name: Option<String>,
  ) -> Result<Option<Subject>, Infallible> {
    let mut inner = self.inner.lock().await;
    let Some(subject) = inner.subjects.iter_mut().find(|s| s.id == id) else {
      return Ok(None);
    };
    subject.name = name;
    tracing::debug!(id, "subject renamed");
    Ok(Some(subject.clone()))
  }

  async fn remove_subject(&self, id: SubjectId) -> Result<Option<Subject>, Infallible> {
    let mut inner = self.inner.lock().await;
    let Some(pos) = inner.subjects.iter().position(|s| s.id == id) else {
      return Ok(None);
    };
    let removed = inner.subjects.remove(pos);
    tracing::debug!(id, "subject removed");
    Ok(Some(removed))
  }
}
