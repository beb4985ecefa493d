//! # pass-store
//!
//! Persistence and orchestration for PASS assessments.
//!
//! - [`repository::Repository`] is the storage seam: a user directory plus
//!   per-user [`UserRecord`](pass_core::entities::UserRecord)s.
//! - [`memory::MemoryRepository`] keeps everything in memory.
//! - [`file::FileRepository`] stores JSON documents with an append-only JSONL
//!   history log per user.
//! - [`service::AssessmentService`] runs every operation that reads or mutates
//!   a single user's record, and snapshots the cohort for statistics.

pub mod error;
pub mod file;
pub mod history_log;
pub mod memory;
pub mod repository;
pub mod service;
mod test_support;

pub use error::StoreError;
pub use file::FileRepository;
pub use memory::MemoryRepository;
pub use repository::Repository;
pub use service::AssessmentService;
