//! Entity structs for all assessment domain objects.
//!
//! Persisted entities derive `Serialize`, `Deserialize`, and `JsonSchema` for
//! JSON roundtrip and schema validation.

mod history;
mod progress;
mod record;
mod user;

pub use history::{BalanceReport, HistorySession, OverallScore, StandardizedSet, UserStatistics};
pub use progress::{DimensionResult, SUB_TESTS_PER_DIMENSION, SubTestResult, TestProgress};
pub use record::UserRecord;
pub use user::User;
