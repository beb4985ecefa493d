use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Every dimension is assessed through three sub-tests.
pub const SUB_TESTS_PER_DIMENSION: usize = 3;

/// Outcome of one completed sub-test (one mini-game).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SubTestResult {
    /// Position of the sub-test within its dimension (0..3).
    pub sub_test_index: u8,
    /// Bounded raw score in `[0, 33]`.
    pub raw_score: f64,
    pub correct_count: u32,
    pub total_count: u32,
    pub wrong_count: u32,
    pub avg_reaction_time_ms: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Scores of the three sub-tests of one dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DimensionResult {
    pub scores: [f64; SUB_TESTS_PER_DIMENSION],
    pub details: [Option<SubTestResult>; SUB_TESTS_PER_DIMENSION],
    /// Always `scores.iter().sum()`.
    pub total_score: f64,
}

impl DimensionResult {
    /// Store (or overwrite) one sub-test and recompute the total.
    pub(crate) fn set(&mut self, result: SubTestResult) {
        let idx = usize::from(result.sub_test_index);
        self.scores[idx] = result.raw_score;
        self.details[idx] = Some(result);
        self.total_score = self.scores.iter().sum();
    }
}

/// Which sub-tests of a dimension are done.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestProgress {
    /// `true` once all three sub-tests are done.
    pub completed: bool,
    pub sub_tests: [bool; SUB_TESTS_PER_DIMENSION],
}

impl TestProgress {
    pub(crate) fn mark(&mut self, index: usize) {
        self.sub_tests[index] = true;
        self.completed = self.sub_tests.iter().all(|done| *done);
    }

    /// Whether any sub-test of the dimension has been done.
    #[must_use]
    pub fn started(&self) -> bool {
        self.sub_tests.iter().any(|done| *done)
    }
}
