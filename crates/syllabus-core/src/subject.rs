//! Subject — one named record in the registry.

use serde::{Deserialize, Serialize};

/// Registry-assigned identifier. Never reused once handed out.
pub type SubjectId = u64;

/// A named record.
///
/// `name` is free-form and unvalidated. It is `None` only when a client
/// created or renamed the subject without sending a name at all; such a
/// subject serialises without a `name` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub id:   SubjectId,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

impl Subject {
  pub fn new(id: SubjectId, name: impl Into<String>) -> Self {
    Self { id, name: Some(name.into()) }
  }
}
