//! In-memory backend for the Syllabus subject registry.
//!
//! The collection and its id counter sit behind a single
//! [`tokio::sync::Mutex`], so every read-modify-write is serialised even on a
//! multi-threaded runtime. Nothing is persisted.

mod store;

pub use store::{MemoryStore, SEED_SUBJECTS};

#[cfg(test)]
mod tests;
