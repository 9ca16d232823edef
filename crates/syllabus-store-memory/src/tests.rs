//! Tests for `MemoryStore`.

use syllabus_core::{Subject, SubjectRegistry};

use crate::MemoryStore;

fn names(subjects: &[Subject]) -> Vec<Option<&str>> {
  subjects.iter().map(|s| s.name.as_deref()).collect()
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seeded_store_has_three_subjects_in_order() {
  let s = MemoryStore::seeded();
  let all = s.list_subjects().await.unwrap();
  assert_eq!(
    all,
    vec![
      Subject::new(1, "Toán"),
      Subject::new(2, "Văn"),
      Subject::new(3, "Anh"),
    ]
  );
}

#[tokio::test]
async fn first_create_after_seed_gets_id_4() {
  let s = MemoryStore::seeded();
  let created = s.add_subject(Some("Lý".into())).await.unwrap();
  assert_eq!(created, Subject::new(4, "Lý"));
}

#[tokio::test]
async fn empty_store_starts_at_1() {
  let s = MemoryStore::new();
  assert!(s.list_subjects().await.unwrap().is_empty());
  let created = s.add_subject(Some("Sử".into())).await.unwrap();
  assert_eq!(created.id, 1);
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_appends_at_end() {
  let s = MemoryStore::seeded();
  s.add_subject(Some("Lý".into())).await.unwrap();
  let all = s.list_subjects().await.unwrap();
  assert_eq!(names(&all), vec![Some("Toán"), Some("Văn"), Some("Anh"), Some("Lý")]);
}

#[tokio::test]
async fn create_accepts_empty_and_absent_names() {
  let s = MemoryStore::new();
  let empty = s.add_subject(Some(String::new())).await.unwrap();
  let absent = s.add_subject(None).await.unwrap();
  assert_eq!(empty.name.as_deref(), Some(""));
  assert_eq!(absent.name, None);
  assert_eq!(s.list_subjects().await.unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_names_are_allowed() {
  let s = MemoryStore::new();
  let a = s.add_subject(Some("Hoá".into())).await.unwrap();
  let b = s.add_subject(Some("Hoá".into())).await.unwrap();
  assert_ne!(a.id, b.id);
}

// ─── Rename ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rename_replaces_name_in_place() {
  let s = MemoryStore::seeded();
  let updated = s.rename_subject(2, Some("Văn học".into())).await.unwrap();
  assert_eq!(updated, Some(Subject::new(2, "Văn học")));

  let all = s.list_subjects().await.unwrap();
  assert_eq!(names(&all), vec![Some("Toán"), Some("Văn học"), Some("Anh")]);
}

#[tokio::test]
async fn rename_missing_returns_none() {
  let s = MemoryStore::seeded();
  assert_eq!(s.rename_subject(42, Some("x".into())).await.unwrap(), None);
  assert_eq!(s.list_subjects().await.unwrap().len(), 3);
}

// ─── Remove ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn remove_returns_subject_and_drops_it() {
  let s = MemoryStore::seeded();
  let removed = s.remove_subject(1).await.unwrap();
  assert_eq!(removed, Some(Subject::new(1, "Toán")));

  let all = s.list_subjects().await.unwrap();
  assert_eq!(all.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 3]);
}

#[tokio::test]
async fn removing_twice_returns_none_the_second_time() {
  let s = MemoryStore::seeded();
  assert!(s.remove_subject(3).await.unwrap().is_some());
  assert!(s.remove_subject(3).await.unwrap().is_none());
}

// ─── Id monotonicity ─────────────────────────────────────────────────────────

#[tokio::test]
async fn removed_ids_are_never_reused() {
  let s = MemoryStore::seeded();
  let a = s.add_subject(Some("Lý".into())).await.unwrap();
  s.remove_subject(a.id).await.unwrap();
  s.remove_subject(2).await.unwrap();

  let b = s.add_subject(Some("Hoá".into())).await.unwrap();
  assert_eq!(b.id, a.id + 1);
}

#[tokio::test]
async fn each_create_gets_a_strictly_greater_id() {
  let s = MemoryStore::seeded();
  let mut last = 3;
  for i in 0..10 {
    let created = s.add_subject(Some(format!("s{i}"))).await.unwrap();
    assert!(created.id > last);
    last = created.id;
    if i % 3 == 0 {
      s.remove_subject(created.id).await.unwrap();
    }
  }
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
  let s = MemoryStore::new();
  let handles: Vec<_> = (0..32)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move { s.add_subject(Some(format!("s{i}"))).await.unwrap().id })
    })
    .collect();

  let mut ids = Vec::new();
  for h in handles {
    ids.push(h.await.unwrap());
  }
  ids.sort_unstable();
  ids.dedup();
  assert_eq!(ids.len(), 32);
  assert_eq!(s.list_subjects().await.unwrap().len(), 32);
}
