//! End-to-end flow through the pure engine: score sub-tests, fill a record,
//! standardize, and append history.

use chrono::{TimeZone, Utc};
use pass_core::advice::{personalized_advice, suggestions};
use pass_core::entities::{User, UserRecord};
use pass_core::enums::{AgeGroup, Dimension, Gender, RatingLevel};
use pass_core::history::{build_session, improvement};
use pass_core::norms::NormativeTable;
use pass_core::scoring::{TrialFeed, score_sub_test};
use pass_core::standard::standardize;
use pretty_assertions::assert_eq;

fn ten_year_old() -> User {
    User {
        id: "usr-0a0b0c0d".into(),
        name: "Mei".into(),
        age: 10,
        gender: Gender::Female,
        created_at: Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap(),
    }
}

fn fast_perfect_feed() -> TrialFeed {
    TrialFeed {
        correct_count: 10,
        total_count: 10,
        reaction_times_ms: vec![250.0, 300.0, 280.0],
    }
}

#[test]
fn full_assessment_reaches_history() {
    let user = ten_year_old();
    let group = user.age_group();
    assert_eq!(group, AgeGroup::UpperPrimary);

    let at = Utc.with_ymd_and_hms(2026, 5, 2, 9, 0, 0).unwrap();
    let mut record = UserRecord::new(&user.id);
    for dimension in Dimension::ALL {
        for index in 0..3u8 {
            let result = score_sub_test(&fast_perfect_feed(), group, dimension, index, at).unwrap();
            assert_eq!(result.raw_score, 33.0);
            record.record_sub_test(dimension, result).unwrap();
        }
    }
    assert!(record.is_all_completed());
    assert_eq!(record.overall_raw_scores(), [99.0; 4]);

    let norms = NormativeTable::builtin();
    let session = build_session(
        "tst-00000001".into(),
        at,
        record.overall_raw_scores(),
        group,
        900_000,
        &norms,
    )
    .unwrap();
    assert!(!session.estimated);
    assert_eq!(session.overall.rating, RatingLevel::Exceptional);

    record.push_session(session);
    let stats = record.statistics.as_ref().unwrap();
    assert_eq!(stats.total_tests, 1);
    assert_eq!(stats.best_score, 396.0);
    assert_eq!(stats.improvement_rate, 0.0);
    assert!(improvement(&record.history, Dimension::Planning).is_none());
}

#[test]
fn partial_scores_produce_targeted_advice() {
    let norms = NormativeTable::builtin();
    let profile = standardize(&[40.0, 72.0, 78.0, 70.0], AgeGroup::UpperPrimary, &norms).unwrap();
    let planning = profile.score(Dimension::Planning);
    assert!(planning.percentile < 30.0);

    let advice = personalized_advice(&profile);
    assert!(advice.iter().any(|a| a.dimension == Some(Dimension::Planning)));
    assert_eq!(suggestions(Dimension::Planning, 40.0).len(), 3);
}
