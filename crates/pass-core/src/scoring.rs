//! Raw sub-test scoring.
//!
//! Converts trial-level accuracy and reaction time into a bounded raw score
//! (0–33 per sub-test, three sub-tests per dimension). Accuracy and speed are
//! weighted per dimension and scaled by an age-group difficulty factor that
//! gives younger children a bonus for the same performance.
//!
//! A response with 0% accuracy still earns speed credit when it is fast. This
//! matches the scoring rules the assessment has always shipped with and is kept
//! deliberately.

use chrono::{DateTime, Utc};

use crate::entities::{SUB_TESTS_PER_DIMENSION, SubTestResult};
use crate::enums::{AgeGroup, Dimension};
use crate::errors::{CoreError, ensure_finite};
use crate::round1;

/// Upper bound of a sub-test score.
pub const MAX_SUB_TEST_SCORE: f64 = 33.0;

/// Reaction times below this are treated as this value.
pub const MIN_REACTION_TIME_MS: f64 = 200.0;

/// Average reaction time assumed when a sub-test recorded none.
pub const DEFAULT_REACTION_TIME_MS: f64 = 5000.0;

/// Speed ratio cap: answering faster than half the expected latency earns nothing extra.
const MAX_SPEED_RATIO: f64 = 2.0;

/// Share of the sub-test maximum awarded for accuracy vs. speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionWeights {
    pub accuracy: f64,
    pub speed: f64,
}

/// Accuracy/speed weights. Each pair sums to 1.
#[must_use]
pub const fn weights(dimension: Dimension) -> DimensionWeights {
    let (accuracy, speed) = match dimension {
        Dimension::Planning => (0.6, 0.4),
        Dimension::Attention => (0.5, 0.5),
        Dimension::Simultaneous => (0.75, 0.25),
        Dimension::Successive => (0.7, 0.3),
    };
    DimensionWeights { accuracy, speed }
}

/// Multiplier applied to both accuracy and speed credit.
#[must_use]
pub const fn difficulty_factor(group: AgeGroup) -> f64 {
    match group {
        AgeGroup::Preschool => 1.3,
        AgeGroup::LowerPrimary => 1.15,
        AgeGroup::UpperPrimary | AgeGroup::Unknown => 1.0,
        AgeGroup::JuniorHigh => 0.9,
        AgeGroup::SeniorHigh => 0.85,
    }
}

/// Expected response latency of the dimension's tasks for a reference child.
#[must_use]
pub const fn base_reaction_time_ms(dimension: Dimension) -> f64 {
    match dimension {
        Dimension::Planning => 3000.0,
        Dimension::Attention => 1500.0,
        Dimension::Simultaneous => 4000.0,
        Dimension::Successive => 2500.0,
    }
}

/// Latency multiplier per age group; younger children are expected to be slower.
#[must_use]
pub const fn age_time_factor(group: AgeGroup) -> f64 {
    match group {
        AgeGroup::Preschool => 1.5,
        AgeGroup::LowerPrimary => 1.3,
        AgeGroup::UpperPrimary => 1.1,
        AgeGroup::JuniorHigh | AgeGroup::Unknown => 1.0,
        AgeGroup::SeniorHigh => 0.9,
    }
}

/// Expected latency for a dimension and age group.
#[must_use]
pub fn expected_reaction_time_ms(dimension: Dimension, group: AgeGroup) -> f64 {
    base_reaction_time_ms(dimension) * age_time_factor(group)
}

/// Raw sub-test score from a correct rate and an average reaction time.
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` if `correct_rate` is NaN or outside
/// `[0, 1]`, or if `avg_reaction_time_ms` is NaN or not positive.
pub fn calculate_score(
    correct_rate: f64,
    avg_reaction_time_ms: f64,
    group: AgeGroup,
    dimension: Dimension,
) -> Result<f64, CoreError> {
    if correct_rate.is_nan() || !(0.0..=1.0).contains(&correct_rate) {
        return Err(CoreError::InvalidInput(format!(
            "correct rate must be within [0, 1], got {correct_rate}"
        )));
    }
    if avg_reaction_time_ms.is_nan() || avg_reaction_time_ms <= 0.0 {
        return Err(CoreError::InvalidInput(format!(
            "average reaction time must be positive, got {avg_reaction_time_ms}"
        )));
    }

    let w = weights(dimension);
    let difficulty = difficulty_factor(group);

    let accuracy_score = correct_rate * MAX_SUB_TEST_SCORE * w.accuracy * difficulty;

    let expected = expected_reaction_time_ms(dimension, group);
    let speed_ratio =
        (expected / avg_reaction_time_ms.max(MIN_REACTION_TIME_MS)).clamp(0.0, MAX_SPEED_RATIO);
    let speed_score = speed_ratio * MAX_SUB_TEST_SCORE * w.speed * difficulty / 2.0;

    Ok(round1(accuracy_score + speed_score).min(MAX_SUB_TEST_SCORE))
}

/// Raw trial data reported by a finished mini-game.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrialFeed {
    pub correct_count: u32,
    pub total_count: u32,
    pub reaction_times_ms: Vec<f64>,
}

impl TrialFeed {
    /// `correct / max(total, 1)`.
    #[must_use]
    pub fn correct_rate(&self) -> f64 {
        f64::from(self.correct_count) / f64::from(self.total_count.max(1))
    }

    /// Mean reaction time, or [`DEFAULT_REACTION_TIME_MS`] when none were recorded.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` for a non-finite or non-positive sample.
    pub fn avg_reaction_time_ms(&self) -> Result<f64, CoreError> {
        if self.reaction_times_ms.is_empty() {
            return Ok(DEFAULT_REACTION_TIME_MS);
        }
        for rt in &self.reaction_times_ms {
            ensure_finite("reaction time", *rt)?;
            if *rt <= 0.0 {
                return Err(CoreError::InvalidInput(format!(
                    "reaction times must be positive, got {rt}"
                )));
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.reaction_times_ms.len() as f64;
        Ok(self.reaction_times_ms.iter().sum::<f64>() / n)
    }
}

/// Score one finished sub-test and package it as a [`SubTestResult`].
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` if `correct_count > total_count`, the
/// sub-test index is out of range, or a reaction time is invalid.
pub fn score_sub_test(
    feed: &TrialFeed,
    group: AgeGroup,
    dimension: Dimension,
    sub_test_index: u8,
    recorded_at: DateTime<Utc>,
) -> Result<SubTestResult, CoreError> {
    if usize::from(sub_test_index) >= SUB_TESTS_PER_DIMENSION {
        return Err(CoreError::InvalidInput(format!(
            "sub-test index {sub_test_index} out of range for {dimension}"
        )));
    }
    if feed.correct_count > feed.total_count {
        return Err(CoreError::InvalidInput(format!(
            "correct count {} exceeds total count {}",
            feed.correct_count, feed.total_count
        )));
    }

    let avg_rt = feed.avg_reaction_time_ms()?;
    let raw_score = calculate_score(feed.correct_rate(), avg_rt, group, dimension)?;

    Ok(SubTestResult {
        sub_test_index,
        raw_score,
        correct_count: feed.correct_count,
        total_count: feed.total_count,
        wrong_count: feed.total_count - feed.correct_count,
        avg_reaction_time_ms: avg_rt.round(),
        recorded_at,
    })
}
