//! The assembled per-user report: profile, levels, suggestions, and advice.

use std::collections::BTreeMap;

use serde::Serialize;

use pass_core::advice::{
    Advice, Encouragement, Guidance, ScoreBand, motivational_advice, parent_guidance,
    personalized_advice, score_level, suggestions,
};
use pass_core::entities::{BalanceReport, User};
use pass_core::enums::{AgeGroup, Dimension};
use pass_core::standard::{StandardizedProfile, standardize};

use crate::error::StoreError;
use crate::repository::Repository;
use crate::service::AssessmentService;

/// Where the report's raw scores came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportSource {
    /// The latest finished session.
    Session { session_id: String },
    /// The in-progress assessment, possibly incomplete.
    InProgress { completed_dimensions: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub user: User,
    pub age_group: AgeGroup,
    pub source: ReportSource,
    pub raw_scores: [f64; 4],
    pub levels: BTreeMap<Dimension, ScoreBand>,
    pub profile: StandardizedProfile,
    pub balance: BalanceReport,
    pub suggestions: BTreeMap<Dimension, &'static [&'static str]>,
    pub advice: Vec<Advice>,
    pub encouragement: Vec<Encouragement>,
    pub guidance: Vec<Guidance>,
}

impl<R: Repository> AssessmentService<R> {
    /// Build the full report for a user.
    ///
    /// Uses the latest history session when there is one, otherwise the
    /// in-progress totals. The age group is the user's current one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown user.
    pub fn report(&self, user_id: &str) -> Result<AssessmentReport, StoreError> {
        let user = self.require_user(user_id)?;
        let record = self.record_or_new(user_id)?;
        let age_group = user.age_group();

        let (source, raw_scores) = match record.history.last() {
            Some(session) => (
                ReportSource::Session {
                    session_id: session.id.clone(),
                },
                session.raw_scores,
            ),
            None => (
                ReportSource::InProgress {
                    completed_dimensions: record.completed_count(),
                },
                record.overall_raw_scores(),
            ),
        };

        let profile = standardize(&raw_scores, age_group, &self.norms)?;
        if profile.estimated() {
            tracing::warn!(user_id, group = %age_group, "report uses estimated norms");
        }

        let improvements =
            Dimension::ALL.map(|d| pass_core::history::improvement(&record.history, d));

        Ok(AssessmentReport {
            age_group,
            source,
            raw_scores,
            levels: Dimension::ALL
                .into_iter()
                .map(|d| (d, score_level(raw_scores[d.index()])))
                .collect(),
            balance: profile.balance(),
            suggestions: Dimension::ALL
                .into_iter()
                .map(|d| (d, suggestions(d, raw_scores[d.index()])))
                .collect(),
            advice: personalized_advice(&profile),
            encouragement: motivational_advice(&improvements),
            guidance: parent_guidance(&profile),
            profile,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{day, test_service};
    use pass_core::advice::ScoreLevel;
    use pass_core::enums::Gender;
    use pretty_assertions::assert_eq;

    #[test]
    fn report_without_history_uses_progress() {
        let mut svc = test_service();
        let user = svc.create_user("Rui", 10, Gender::Male).unwrap();
        let report = svc.report(&user.id).unwrap();
        assert_eq!(
            report.source,
            ReportSource::InProgress {
                completed_dimensions: 0
            }
        );
        assert_eq!(report.raw_scores, [0.0; 4]);
        assert_eq!(report.levels[&Dimension::Planning].level, ScoreLevel::NeedsAttention);
    }

    #[test]
    fn report_uses_latest_session() {
        let mut svc = test_service();
        let user = svc.create_user("Rui", 10, Gender::Male).unwrap();
        svc.record_session_at(&user.id, [60.0; 4], user.age_group(), 1, day(1))
            .unwrap();
        let latest = svc
            .record_session_at(&user.id, [92.0, 72.0, 50.0, 70.0], user.age_group(), 1, day(9))
            .unwrap();

        let report = svc.report(&user.id).unwrap();
        assert_eq!(
            report.source,
            ReportSource::Session {
                session_id: latest.id
            }
        );
        assert_eq!(report.levels[&Dimension::Planning].level, ScoreLevel::Excellent);
        assert_eq!(report.balance.weakest, Dimension::Simultaneous);
        assert!(!report.advice.is_empty());
        assert!(!report.encouragement.is_empty());
        assert_eq!(report.guidance.len(), 3);
    }
}
