//! In-progress assessment: sub-test submission, completion, and reset.

use chrono::{DateTime, Utc};

use pass_core::entities::{HistorySession, SubTestResult, UserRecord};
use pass_core::enums::Dimension;
use pass_core::scoring::{TrialFeed, score_sub_test};
use pass_core::standard::{StandardizedProfile, standardize};

use crate::error::StoreError;
use crate::repository::Repository;
use crate::service::AssessmentService;

impl<R: Repository> AssessmentService<R> {
    /// Score a finished sub-test from its trial feed and store it.
    ///
    /// Re-submitting the same sub-test overwrites the earlier result.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user and
    /// `StoreError::Core` for invalid trial data or sub-test index.
    pub fn submit_sub_test(
        &mut self,
        user_id: &str,
        dimension: Dimension,
        sub_test_index: u8,
        feed: &TrialFeed,
    ) -> Result<SubTestResult, StoreError> {
        self.submit_sub_test_at(user_id, dimension, sub_test_index, feed, Utc::now())
    }

    /// [`Self::submit_sub_test`] with an explicit recording time.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit_sub_test`].
    pub fn submit_sub_test_at(
        &mut self,
        user_id: &str,
        dimension: Dimension,
        sub_test_index: u8,
        feed: &TrialFeed,
        recorded_at: DateTime<Utc>,
    ) -> Result<SubTestResult, StoreError> {
        let user = self.require_user(user_id)?;
        let result = score_sub_test(
            feed,
            user.age_group(),
            dimension,
            sub_test_index,
            recorded_at,
        )?;

        let mut record = self.record_or_new(user_id)?;
        record.record_sub_test(dimension, result.clone())?;
        self.repo.save_record(&record)?;
        tracing::debug!(
            user_id,
            %dimension,
            sub_test = sub_test_index,
            score = result.raw_score,
            "recorded sub-test"
        );
        Ok(result)
    }

    /// The user's current record. Users who have not started get an empty one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user.
    pub fn progress(&self, user_id: &str) -> Result<UserRecord, StoreError> {
        self.require_user(user_id)?;
        self.record_or_new(user_id)
    }

    /// Clear the in-progress assessment. History is kept.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user.
    pub fn reset_progress(&mut self, user_id: &str) -> Result<(), StoreError> {
        self.require_user(user_id)?;
        let mut record = self.record_or_new(user_id)?;
        record.reset_progress();
        self.repo.save_record(&record)?;
        tracing::debug!(user_id, "reset assessment progress");
        Ok(())
    }

    /// Append a fully completed assessment to history.
    ///
    /// The age group comes from the user's current age, and the duration runs
    /// from the first sub-test recorded since the previous finish (or reset) to
    /// `finished_at`. Dimension results are kept as the user's latest scores
    /// until [`Self::reset_progress`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidState` unless all four dimensions are
    /// complete, or if no sub-test changed since the last finished session.
    pub fn finish_assessment(
        &mut self,
        user_id: &str,
        finished_at: DateTime<Utc>,
    ) -> Result<HistorySession, StoreError> {
        let user = self.require_user(user_id)?;
        let mut record = self.record_or_new(user_id)?;
        if !record.is_all_completed() {
            return Err(StoreError::InvalidState(format!(
                "assessment for '{user_id}' is incomplete: {} of 4 dimensions done",
                record.completed_count()
            )));
        }

        if let Some(last) = record.history.last() {
            if last.raw_scores == record.overall_raw_scores()
                && last_recorded_at(&record).is_none_or(|at| at <= last.timestamp)
            {
                return Err(StoreError::InvalidState(format!(
                    "assessment for '{user_id}' was already recorded as session {}",
                    last.id
                )));
            }
        }

        let duration_ms = record
            .started_at
            .map_or(0, |start| (finished_at - start).num_milliseconds().max(0));
        let duration_ms = u64::try_from(duration_ms).unwrap_or(0);

        let raw_scores = record.overall_raw_scores();
        let session = self.append_session(
            &mut record,
            raw_scores,
            user.age_group(),
            duration_ms,
            finished_at,
        )?;
        // The next sub-test starts the clock for the next assessment.
        record.started_at = None;
        self.repo.save_record(&record)?;
        Ok(session)
    }

    /// Standardized profile of the current in-progress totals.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user.
    pub fn current_profile(&self, user_id: &str) -> Result<StandardizedProfile, StoreError> {
        let user = self.require_user(user_id)?;
        let record = self.record_or_new(user_id)?;
        let profile = standardize(&record.overall_raw_scores(), user.age_group(), &self.norms)?;
        if profile.estimated() {
            tracing::warn!(user_id, group = %user.age_group(), "profile uses estimated norms");
        }
        Ok(profile)
    }
}

/// Latest recording time across all stored sub-tests.
fn last_recorded_at(record: &UserRecord) -> Option<DateTime<Utc>> {
    record
        .results
        .iter()
        .flat_map(|r| r.details.iter().flatten())
        .map(|d| d.recorded_at)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{day, test_service};
    use pass_core::enums::Gender;
    use pretty_assertions::assert_eq;

    fn feed(correct: u32) -> TrialFeed {
        TrialFeed {
            correct_count: correct,
            total_count: 10,
            reaction_times_ms: vec![900.0, 1100.0],
        }
    }

    #[test]
    fn submitting_three_sub_tests_completes_a_dimension() {
        let mut svc = test_service();
        let user = svc.create_user("Kai", 10, Gender::Male).unwrap();
        for i in 0..3 {
            svc.submit_sub_test_at(&user.id, Dimension::Planning, i, &feed(8), day(2))
                .unwrap();
        }
        let record = svc.progress(&user.id).unwrap();
        assert!(record.progress(Dimension::Planning).completed);
        assert_eq!(record.completed_count(), 1);
        assert_eq!(record.started_at, Some(day(2)));
    }

    #[test]
    fn invalid_feed_is_rejected() {
        let mut svc = test_service();
        let user = svc.create_user("Kai", 10, Gender::Male).unwrap();
        let bad = TrialFeed {
            correct_count: 11,
            total_count: 10,
            reaction_times_ms: Vec::new(),
        };
        assert!(matches!(
            svc.submit_sub_test(&user.id, Dimension::Attention, 0, &bad),
            Err(StoreError::Core(_))
        ));
        assert!(svc.repo().load_record(&user.id).unwrap().is_none());
    }

    #[test]
    fn unknown_user_cannot_submit() {
        let mut svc = test_service();
        assert!(matches!(
            svc.submit_sub_test("usr-ffffffff", Dimension::Planning, 0, &feed(5)),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn finish_requires_all_dimensions() {
        let mut svc = test_service();
        let user = svc.create_user("Kai", 10, Gender::Male).unwrap();
        svc.submit_sub_test_at(&user.id, Dimension::Planning, 0, &feed(8), day(2))
            .unwrap();
        assert!(matches!(
            svc.finish_assessment(&user.id, day(3)),
            Err(StoreError::InvalidState(_))
        ));
    }

    #[test]
    fn finish_appends_history_once() {
        let mut svc = test_service();
        let user = svc.create_user("Kai", 10, Gender::Male).unwrap();
        for dimension in Dimension::ALL {
            for i in 0..3 {
                svc.submit_sub_test_at(&user.id, dimension, i, &feed(9), day(2))
                    .unwrap();
            }
        }
        let before = svc.progress(&user.id).unwrap().overall_raw_scores();

        let session = svc
            .finish_assessment(&user.id, day(2) + chrono::Duration::minutes(12))
            .unwrap();
        assert_eq!(session.raw_scores, before);
        assert_eq!(session.duration_ms, 12 * 60 * 1000);

        let record = svc.progress(&user.id).unwrap();
        assert_eq!(record.history.len(), 1);
        assert_eq!(record.completed_count(), 4);
        assert_eq!(record.statistics.unwrap().total_tests, 1);

        assert!(matches!(
            svc.finish_assessment(&user.id, day(4)),
            Err(StoreError::InvalidState(_))
        ));
    }

    #[test]
    fn next_assessment_duration_starts_after_finish() {
        let mut svc = test_service();
        let user = svc.create_user("Kai", 10, Gender::Male).unwrap();
        for dimension in Dimension::ALL {
            for i in 0..3 {
                svc.submit_sub_test_at(&user.id, dimension, i, &feed(9), day(2))
                    .unwrap();
            }
        }
        svc.finish_assessment(&user.id, day(2) + chrono::Duration::minutes(12))
            .unwrap();
        assert_eq!(svc.progress(&user.id).unwrap().started_at, None);

        svc.submit_sub_test_at(&user.id, Dimension::Planning, 0, &feed(6), day(5))
            .unwrap();
        let second = svc
            .finish_assessment(&user.id, day(5) + chrono::Duration::minutes(5))
            .unwrap();
        assert_eq!(second.duration_ms, 5 * 60 * 1000);
        assert_eq!(svc.progress(&user.id).unwrap().history.len(), 2);
    }

    #[test]
    fn current_profile_standardizes_in_progress_totals() {
        let mut svc = test_service();
        let user = svc.create_user("Kai", 10, Gender::Male).unwrap();
        for i in 0..3 {
            svc.submit_sub_test_at(&user.id, Dimension::Attention, i, &feed(9), day(2))
                .unwrap();
        }
        let record = svc.progress(&user.id).unwrap();
        let profile = svc.current_profile(&user.id).unwrap();
        assert_eq!(profile.age_group, user.age_group());
        assert_eq!(
            profile.score(Dimension::Attention).raw,
            record.overall_raw_scores()[Dimension::Attention.index()]
        );
        assert_eq!(profile.score(Dimension::Planning).raw, 0.0);
    }

    #[test]
    fn reset_keeps_history() {
        let mut svc = test_service();
        let user = svc.create_user("Kai", 10, Gender::Male).unwrap();
        svc.record_session_at(&user.id, [70.0; 4], user.age_group(), 1000, day(2))
            .unwrap();
        svc.submit_sub_test_at(&user.id, Dimension::Successive, 1, &feed(4), day(3))
            .unwrap();
        svc.reset_progress(&user.id).unwrap();

        let record = svc.progress(&user.id).unwrap();
        assert_eq!(record.history.len(), 1);
        assert!(!record.progress(Dimension::Successive).started());
    }
}
