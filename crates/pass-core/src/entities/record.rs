use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::history::{HistorySession, UserStatistics};
use super::progress::{DimensionResult, SUB_TESTS_PER_DIMENSION, SubTestResult, TestProgress};
use crate::enums::Dimension;
use crate::errors::CoreError;
use crate::history::summarize;
use crate::scoring::MAX_SUB_TEST_SCORE;

/// Upper bound of a dimension total on the 0–100 scale.
pub const MAX_DIMENSION_TOTAL: f64 = 100.0;

/// Everything persisted for one user: in-progress assessment plus history.
///
/// This is the unit a repository loads and saves.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UserRecord {
    pub user_id: String,
    /// Progress per dimension, canonical order.
    pub progress: [TestProgress; 4],
    /// Results per dimension, canonical order.
    pub results: [DimensionResult; 4],
    /// When the first sub-test of the current assessment was recorded.
    pub started_at: Option<DateTime<Utc>>,
    /// Append-only, in chronological order.
    #[serde(default)]
    pub history: Vec<HistorySession>,
    #[serde(default)]
    pub statistics: Option<UserStatistics>,
}

impl UserRecord {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            progress: Default::default(),
            results: Default::default(),
            started_at: None,
            history: Vec::new(),
            statistics: None,
        }
    }

    /// Store a sub-test result, overwriting a previous run of the same sub-test.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if the sub-test index is out of range,
    /// the raw score is not a finite value in `[0, 33]`, or the counts
    /// contradict each other.
    pub fn record_sub_test(
        &mut self,
        dimension: Dimension,
        result: SubTestResult,
    ) -> Result<(), CoreError> {
        let idx = usize::from(result.sub_test_index);
        if idx >= SUB_TESTS_PER_DIMENSION {
            return Err(CoreError::InvalidInput(format!(
                "sub-test index {idx} out of range for {dimension}"
            )));
        }
        check_sub_test(dimension, &result)?;
        if self.started_at.is_none() {
            self.started_at = Some(result.recorded_at);
        }
        self.results[dimension.index()].set(result);
        self.progress[dimension.index()].mark(idx);
        Ok(())
    }

    #[must_use]
    pub const fn progress(&self, dimension: Dimension) -> &TestProgress {
        &self.progress[dimension.index()]
    }

    #[must_use]
    pub const fn result(&self, dimension: Dimension) -> &DimensionResult {
        &self.results[dimension.index()]
    }

    /// Number of dimensions with all three sub-tests done.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.progress.iter().filter(|p| p.completed).count()
    }

    #[must_use]
    pub fn is_all_completed(&self) -> bool {
        self.progress.iter().all(|p| p.completed)
    }

    /// Raw dimension totals, canonical order.
    #[must_use]
    pub fn dimension_totals(&self) -> [f64; 4] {
        Dimension::ALL.map(|d| self.results[d.index()].total_score)
    }

    /// Dimension totals rounded and capped at 100, as fed to standardization.
    #[must_use]
    pub fn overall_raw_scores(&self) -> [f64; 4] {
        self.dimension_totals()
            .map(|total| total.round().min(MAX_DIMENSION_TOTAL))
    }

    /// Clear the in-progress assessment. History and statistics are kept.
    pub fn reset_progress(&mut self) {
        self.progress = Default::default();
        self.results = Default::default();
        self.started_at = None;
    }

    /// Append a finished session and refresh the statistics summary.
    ///
    /// The session's timestamp is raised to the previous session's timestamp
    /// if it would otherwise go backwards. Returns `true` when that happened.
    pub fn push_session(&mut self, mut session: HistorySession) -> bool {
        let clamped = match self.history.last() {
            Some(prev) if session.timestamp < prev.timestamp => {
                session.timestamp = prev.timestamp;
                true
            }
            _ => false,
        };
        self.history.push(session);
        self.statistics = summarize(&self.history);
        clamped
    }
}

fn check_sub_test(dimension: Dimension, result: &SubTestResult) -> Result<(), CoreError> {
    if !(0.0..=MAX_SUB_TEST_SCORE).contains(&result.raw_score) {
        return Err(CoreError::InvalidInput(format!(
            "raw score for {dimension} must be within [0, {MAX_SUB_TEST_SCORE}], got {}",
            result.raw_score
        )));
    }
    if result.correct_count > result.total_count {
        return Err(CoreError::InvalidInput(format!(
            "correct count {} exceeds total count {}",
            result.correct_count, result.total_count
        )));
    }
    if result.wrong_count > result.total_count - result.correct_count {
        return Err(CoreError::InvalidInput(format!(
            "wrong count {} exceeds the {} incorrect trials",
            result.wrong_count,
            result.total_count - result.correct_count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn sub_test(index: u8, score: f64) -> SubTestResult {
        SubTestResult {
            sub_test_index: index,
            raw_score: score,
            correct_count: 8,
            total_count: 10,
            wrong_count: 2,
            avg_reaction_time_ms: 1200.0,
            recorded_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn completing_three_sub_tests_completes_dimension() {
        let mut record = UserRecord::new("usr-00000001");
        for (i, score) in [30.0, 28.0, 31.0].into_iter().enumerate() {
            record
                .record_sub_test(Dimension::Planning, sub_test(i as u8, score))
                .unwrap();
        }

        assert_eq!(record.result(Dimension::Planning).total_score, 89.0);
        assert!(record.progress(Dimension::Planning).completed);
        for dim in [Dimension::Attention, Dimension::Simultaneous, Dimension::Successive] {
            assert!(!record.progress(dim).completed);
        }
        assert_eq!(record.completed_count(), 1);
        assert!(!record.is_all_completed());
    }

    #[test]
    fn redoing_a_sub_test_overwrites_it() {
        let mut record = UserRecord::new("usr-00000001");
        record.record_sub_test(Dimension::Attention, sub_test(1, 10.0)).unwrap();
        record.record_sub_test(Dimension::Attention, sub_test(1, 20.0)).unwrap();

        let result = record.result(Dimension::Attention);
        assert_eq!(result.scores, [0.0, 20.0, 0.0]);
        assert_eq!(result.total_score, 20.0);
        assert!(!record.progress(Dimension::Attention).completed);
        assert!(record.progress(Dimension::Attention).started());
    }

    #[test]
    fn out_of_range_sub_test_is_rejected() {
        let mut record = UserRecord::new("usr-00000001");
        assert!(record.record_sub_test(Dimension::Planning, sub_test(3, 10.0)).is_err());
        assert!(record.started_at.is_none());
    }

    #[rstest]
    #[case::above_max(sub_test(0, 500.0))]
    #[case::negative(sub_test(0, -1.0))]
    #[case::nan(sub_test(0, f64::NAN))]
    #[case::infinite(sub_test(0, f64::INFINITY))]
    #[case::correct_exceeds_total(SubTestResult {
        correct_count: 9,
        total_count: 3,
        wrong_count: 0,
        ..sub_test(0, 10.0)
    })]
    #[case::wrong_exceeds_remaining(SubTestResult {
        wrong_count: 5,
        ..sub_test(0, 10.0)
    })]
    fn invalid_sub_test_is_rejected(#[case] result: SubTestResult) {
        let mut record = UserRecord::new("usr-00000001");
        let err = record.record_sub_test(Dimension::Planning, result).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert_eq!(record.result(Dimension::Planning).total_score, 0.0);
        assert!(!record.progress(Dimension::Planning).started());
        assert!(record.started_at.is_none());
    }

    #[test]
    fn boundary_scores_are_accepted() {
        let mut record = UserRecord::new("usr-00000001");
        record.record_sub_test(Dimension::Planning, sub_test(0, 0.0)).unwrap();
        record
            .record_sub_test(Dimension::Planning, sub_test(1, MAX_SUB_TEST_SCORE))
            .unwrap();
        assert_eq!(record.result(Dimension::Planning).total_score, 33.0);
    }

    #[test]
    fn overall_raw_scores_round_and_cap() {
        let mut record = UserRecord::new("usr-00000001");
        record.results[0].total_score = 88.6;
        record.results[1].total_score = 100.4;
        assert_eq!(record.overall_raw_scores(), [89.0, 100.0, 0.0, 0.0]);
    }

    #[test]
    fn reset_keeps_history() {
        let mut record = UserRecord::new("usr-00000001");
        record.record_sub_test(Dimension::Planning, sub_test(0, 10.0)).unwrap();
        record.reset_progress();
        assert_eq!(record.completed_count(), 0);
        assert!(record.started_at.is_none());
        assert_eq!(record.result(Dimension::Planning).total_score, 0.0);
    }
}
