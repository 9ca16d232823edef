//! Core types and trait definitions for the Syllabus subject registry.
//!
//! This crate is deliberately free of HTTP and storage dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod registry;
pub mod subject;

pub use registry::SubjectRegistry;
pub use subject::{Subject, SubjectId};
