//! Session history: recording, retrieval, trends, and comparisons.

use chrono::{DateTime, Utc};

use pass_core::entities::{HistorySession, UserRecord, UserStatistics};
use pass_core::enums::{AgeGroup, Dimension, TrendSeries};
use pass_core::history::{
    Improvement, SessionComparison, TrendPoint, build_session, compare_sessions, improvement,
    recent, trend,
};
use pass_core::ids::{PREFIX_SESSION, generate_id};

use crate::error::StoreError;
use crate::repository::Repository;
use crate::service::AssessmentService;

impl<R: Repository> AssessmentService<R> {
    /// Standardize raw totals and append them as a new history session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user and
    /// `StoreError::Core` for invalid raw scores.
    pub fn record_session(
        &mut self,
        user_id: &str,
        raw_scores: [f64; 4],
        age_group: AgeGroup,
        duration_ms: u64,
    ) -> Result<HistorySession, StoreError> {
        self.record_session_at(user_id, raw_scores, age_group, duration_ms, Utc::now())
    }

    /// [`Self::record_session`] with an explicit timestamp.
    ///
    /// A timestamp earlier than the previous session's is raised to it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::record_session`].
    pub fn record_session_at(
        &mut self,
        user_id: &str,
        raw_scores: [f64; 4],
        age_group: AgeGroup,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Result<HistorySession, StoreError> {
        self.require_user(user_id)?;
        let mut record = self.record_or_new(user_id)?;
        let session =
            self.append_session(&mut record, raw_scores, age_group, duration_ms, timestamp)?;
        self.repo.save_record(&record)?;
        Ok(session)
    }

    /// Build a session and push it onto `record` without saving.
    pub(crate) fn append_session(
        &self,
        record: &mut UserRecord,
        raw_scores: [f64; 4],
        age_group: AgeGroup,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> Result<HistorySession, StoreError> {
        let id = generate_id(PREFIX_SESSION)?;
        let session = build_session(
            id,
            timestamp,
            raw_scores,
            age_group,
            duration_ms,
            &self.norms,
        )?;
        if session.estimated {
            tracing::warn!(
                user_id = %record.user_id,
                session_id = %session.id,
                group = %age_group,
                "session standardized with estimated norms"
            );
        }

        if record.push_session(session) {
            tracing::warn!(
                user_id = %record.user_id,
                %timestamp,
                "session timestamp precedes the previous session; clamped"
            );
        }
        let stored = record
            .history
            .last()
            .cloned()
            .ok_or_else(|| StoreError::InvalidState("session was not appended".into()))?;
        tracing::debug!(user_id = %record.user_id, session_id = %stored.id, "appended session");
        Ok(stored)
    }

    /// The user's sessions, oldest first, optionally only the last `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user.
    pub fn history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<HistorySession>, StoreError> {
        let record = self.progress(user_id)?;
        Ok(recent(&record.history, limit).to_vec())
    }

    /// Percentile (or overall average) trend over all sessions.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user.
    pub fn get_trend(
        &self,
        user_id: &str,
        series: TrendSeries,
    ) -> Result<Vec<TrendPoint>, StoreError> {
        let record = self.progress(user_id)?;
        Ok(trend(&record.history, series).iter().collect())
    }

    /// First-to-last change for one dimension. `None` with fewer than two sessions.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user.
    pub fn calculate_improvement(
        &self,
        user_id: &str,
        dimension: Dimension,
    ) -> Result<Option<Improvement>, StoreError> {
        let record = self.progress(user_id)?;
        Ok(improvement(&record.history, dimension))
    }

    /// Improvement for every dimension, canonical order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user.
    pub fn improvements(&self, user_id: &str) -> Result<[Option<Improvement>; 4], StoreError> {
        let record = self.progress(user_id)?;
        Ok(Dimension::ALL.map(|d| improvement(&record.history, d)))
    }

    /// The stored statistics summary. `None` before the first session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user.
    pub fn statistics(&self, user_id: &str) -> Result<Option<UserStatistics>, StoreError> {
        Ok(self.progress(user_id)?.statistics)
    }

    /// Deltas between two of the user's sessions (`second - first`).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user or session.
    pub fn compare_sessions(
        &self,
        user_id: &str,
        first_id: &str,
        second_id: &str,
    ) -> Result<SessionComparison, StoreError> {
        let record = self.progress(user_id)?;
        compare_sessions(&record.history, first_id, second_id).ok_or_else(|| {
            let missing = if record.history.iter().any(|s| s.id == first_id) {
                second_id
            } else {
                first_id
            };
            StoreError::session_not_found(missing)
        })
    }
}
